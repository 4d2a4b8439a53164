pub mod clock;
pub mod node;
pub mod rng;
pub mod scene;

pub use clock::{Frame, SceneClock};
pub use node::{Node, Shape, ShapeComponent, Stroke};
pub use rng::Rng;
pub use scene::Scene;
