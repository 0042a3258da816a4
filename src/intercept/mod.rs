pub mod events;
mod router;

pub use events::BrowserEvent;
pub use router::EventRouter;
