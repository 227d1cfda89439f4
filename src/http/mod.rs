// HTTP layer: request descriptors, responses, decoration and transport
// Author: kelexine (https://github.com/kelexine)

mod decorator;
mod request;
mod response;
mod transport;

pub use decorator::{GitHubDecorator, RequestDecorator, GITHUB_ACCEPT};
pub use request::{ApiRequest, CacheHint};
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport};
