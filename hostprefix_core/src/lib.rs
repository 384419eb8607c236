mod config;
pub mod error;
mod handler;
mod host_prefix;
mod request;
mod validate;

pub mod prelude {
    pub use crate::config::RequestConfig;
    pub use crate::error::{EndpointError, HostViolation};
    pub use crate::handler::{BuildHandler, BuildHandlers};
    pub use crate::host_prefix::{
        HOST_PREFIX_HANDLER_NAME, HostPrefixBuilder, LabelSet, PrefixTemplate,
        host_prefix_handler,
    };
    pub use crate::request::OutgoingRequest;
    pub use crate::validate::{
        VALIDATE_ENDPOINT_HOST_HANDLER_NAME, ValidateEndpointHostHandler, valid_host_label,
        valid_port_number, validate_endpoint_host,
    };
}
