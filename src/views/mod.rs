pub mod job_card;
