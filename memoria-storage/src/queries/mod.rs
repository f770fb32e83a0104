pub mod checkpoint_ops;
pub mod consistency_ops;
pub mod ghost_ops;
pub mod item_crud;
pub mod kg_ops;
pub mod maintenance;
pub mod outcome_ops;
pub mod profile_ops;
