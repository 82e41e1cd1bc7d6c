use axum::response::Html;

/// The reservation form, bundled into the binary.
pub const RESERVATION_FORM: &str = include_str!("../../assets/reservation_form.html");

pub async fn reservation_form() -> Html<&'static str> {
    Html(RESERVATION_FORM)
}
