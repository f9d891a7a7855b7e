// Application layer - Use case interactors

pub mod compose_interactor;
pub mod container;

// Re-export interactors
pub use compose_interactor::{ComposeInteractor, ComposeResponse, PlanPreview, SelectedAssets};
pub use container::{AppContainer, DefaultAppContainer};
