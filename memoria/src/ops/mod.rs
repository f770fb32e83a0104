mod context;
mod feedback;
mod ghost;
mod lifecycle;
mod maintenance;
