//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no real
//! hardware required.

mod bartender_flow_tests;
mod menu_engine_tests;
mod mock_hw;
mod store_tests;
