use furbish_storefront::{
    dto::orders::CheckoutForm, error::AppError, services::product_service::UploadedFile,
};
use uuid::Uuid;

fn proof() -> UploadedFile {
    UploadedFile {
        file_name: "receipt.PNG".to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

fn filled_form() -> CheckoutForm {
    let mut form = CheckoutForm::default();
    form.set_text("product_id", Uuid::new_v4().to_string());
    form.set_text("size", "M".to_string());
    form.set_text("buyer_name", "Asha Rao".to_string());
    form.set_text("buyer_address", "12 MG Road, Pune".to_string());
    form.set_text("buyer_phone", "+91 98765-43210".to_string());
    form.payment_proof = Some(proof());
    form
}

fn bad_request(form: CheckoutForm) -> String {
    match form.validate() {
        Err(AppError::BadRequest(message)) => message,
        other => panic!("expected a bad request, got {other:?}"),
    }
}

#[test]
fn complete_form_validates_with_default_quantity() {
    let request = filled_form().validate().expect("valid checkout");
    assert_eq!(request.quantity, 1);
    assert_eq!(request.size, "M");
    assert_eq!(request.buyer_name, "Asha Rao");
}

#[test]
fn missing_payment_proof_is_rejected() {
    let mut form = filled_form();
    form.payment_proof = None;
    assert_eq!(bad_request(form), "Payment proof is required");
}

#[test]
fn proof_must_be_an_image() {
    let mut form = filled_form();
    form.payment_proof = Some(UploadedFile {
        file_name: "receipt.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: vec![1, 2, 3],
    });
    assert_eq!(bad_request(form), "Only image uploads are accepted");
}

#[test]
fn blank_required_fields_are_rejected() {
    let mut form = filled_form();
    form.set_text("buyer_address", "   ".to_string());
    assert_eq!(bad_request(form), "buyer_address is required");

    let mut form = filled_form();
    form.size = None;
    assert_eq!(bad_request(form), "size is required");
}

#[test]
fn quantity_must_be_positive() {
    let mut form = filled_form();
    form.set_text("quantity", "0".to_string());
    assert_eq!(bad_request(form), "quantity must be at least 1");

    let mut form = filled_form();
    form.set_text("quantity", "3".to_string());
    assert_eq!(form.validate().expect("valid").quantity, 3);
}

#[test]
fn phone_rejects_letters() {
    let mut form = filled_form();
    form.set_text("buyer_phone", "call me".to_string());
    assert_eq!(bad_request(form), "buyer_phone is not a phone number");
}

#[test]
fn product_id_must_be_a_uuid() {
    let mut form = filled_form();
    form.set_text("product_id", "42".to_string());
    assert_eq!(bad_request(form), "product_id must be a UUID");
}
