pub mod common;

mod test_pp_use;
mod test_status_moves;
