pub mod board_service;
pub mod confirm_service;
pub mod filter_service;
pub mod job_api_service;
pub mod job_list_service;
pub mod toast_service;
