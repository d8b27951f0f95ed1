mod dto;
mod gateway;
mod payload;
mod secrets;
mod transport;

pub use dto::{DatabaseDto, ListBody, PageDto, ProjectDto, QueryBody, RichTextDto};
pub use gateway::{Database, Project, RelationTarget, RemoteGateway, VERSION_HEADER};
pub use payload::build_page_payload;
pub use secrets::{EnvSecretStore, MemorySecretStore, Secret, SecretStore};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
