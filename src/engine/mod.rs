mod simulation;

pub use simulation::{FeedMode, FeedStatus, Simulation, SimulationSettings};
