pub mod controller;
pub mod controls;
pub mod detail;
pub mod error;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod load;
pub mod model;
pub mod store;
pub mod table;
pub mod ui_state;

pub use controller::{Explorer, GraphStats, Response, UiEvent};
pub use detail::DetailView;
pub use error::LoadError;
pub use graph::{build_graph, Graph, Link, Node};
pub use layout::{LayoutConfig, LayoutEngine, LayoutPhase};
pub use model::{Cluster, Document, EdgeRecord, Institution, Period, PipeList};
pub use store::RecordStore;
pub use ui_state::{Chronology, UiState};

pub use bevy_math::Vec2;
