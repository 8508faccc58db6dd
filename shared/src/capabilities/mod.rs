pub mod http;
mod navigate;

pub use self::http::{decode_delete, decode_page, delete_url, from_transport, list_url, RawResponse};
pub use self::navigate::{NavigateOperation, Navigator};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "crate::app::App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub navigator: Navigator<Event>,
    pub render: Render<Event>,
}
