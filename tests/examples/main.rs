//! Example worlds
//!
//! Small pieces of authored content driven end to end through the kernel.

mod pour;
