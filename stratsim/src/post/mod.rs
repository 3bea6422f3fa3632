pub mod sim_result;
