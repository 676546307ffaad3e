//! Data models shared by repositories, services, and the HTTP layer.

mod delivery;
mod guest;

pub use delivery::{ChannelKind, DeliveryLogEntry, DeliveryStatus, NewDeliveryLogEntry};
pub use guest::{Guest, GuestStatus, NewGuest};
