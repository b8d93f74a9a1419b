pub mod job_form;
