//! Client core of the Tawseek Misr government office reservation service.

mod api;
mod config;
mod error;
mod form;
mod i18n;
mod inquiry;
mod landing;
mod model;
mod offices;
mod preferences;
mod repository;
mod reservation;
mod session;
mod validation;

pub use api::*;
pub use config::*;
pub use error::*;
pub use form::*;
pub use i18n::*;
pub use inquiry::*;
pub use landing::*;
pub use model::*;
pub use offices::*;
pub use preferences::*;
pub use repository::*;
pub use reservation::*;
pub use session::*;
pub use validation::*;
