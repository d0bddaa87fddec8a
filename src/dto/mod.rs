pub mod activity_dto;
pub mod candidate_dto;
