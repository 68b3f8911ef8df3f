//! Domain models for the clinic records system.

mod consultation;
mod pager;
mod patient;
mod view;

pub use consultation::*;
pub use pager::*;
pub use patient::*;
pub use view::*;
