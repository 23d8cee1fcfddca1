// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;
pub mod plan_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectFormat, InspectInteractor, InspectRequest, InspectResponse};
pub use plan_interactor::{PlanInteractor, PlanRequest, PlanResponse};
