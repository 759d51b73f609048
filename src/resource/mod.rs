pub mod camera;
pub mod timestep;
