/// This module provides a CSV item reader and writer implementation with typed record binding.
pub mod csv;
