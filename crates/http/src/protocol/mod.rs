//! Core protocol types.
//!
//! - **Message Handling** ([`Message`], [`PayloadItem`], [`PayloadSize`]): the
//!   framing vocabulary shared by the response encoder and the connection
//! - **Request** ([`RequestHead`], [`HeaderFields`]): what the decoder produces
//! - **Response** ([`ResponseHead`]): what handlers send back
//! - **Error Handling**: [`HttpError`], [`ParseError`], [`SendError`]

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod header;
pub use header::HeaderFields;

mod request;
pub use request::RequestHead;

mod response;
pub use response::ResponseHead;
pub use response::SERVER_NAME;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
