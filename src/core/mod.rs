/// Reader and writer seams shared by every item implementation.
pub mod item;
