// CodeLens Library Root
// Copyright (c) 2026 Xing_The_Creator | CodeLens

pub mod config;
pub mod review;
pub mod server;
pub mod state;
pub mod window;
