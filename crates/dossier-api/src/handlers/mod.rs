pub mod register_upload;
