pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn envelope_serializes_null_data_on_failure() {
        let body = types::ApiResponse::<()>::failure("Event not found");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Event not found");
        assert!(json["data"].is_null());
    }

    #[test]
    fn envelope_carries_payload_on_success() {
        let body = types::ApiResponse::ok("Cities retrieved successfully", vec!["Pune"]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0], "Pune");
    }
}
