//! Field catalogue.
//!
//! Every logical field of the booking form, with the ordered list of form
//! names it may arrive under. The first alias that carries a non-empty value
//! wins; nothing else in the system looks at raw form names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    // Personal
    FirstName,
    LastName,
    Phone,
    Email,

    // Property / reservation
    PropertyName,
    CheckIn,
    CheckOut,
    Rooms,
    Adults,
    Children,
    SpecialRequests,

    // Company
    CompanyName,
    LeaderName,
    BillingAddress,
    DirectNumber,

    // Payment
    CardHolderName,
    CardType,
    CardNumber,
    CardExpiry,
    Cvv,
    TodaysDate,

    // Acceptance / audit
    TermsAccepted,
    FormAccessedAt,
}

impl Field {
    pub const ALL: [Field; 23] = [
        Field::FirstName,
        Field::LastName,
        Field::Phone,
        Field::Email,
        Field::PropertyName,
        Field::CheckIn,
        Field::CheckOut,
        Field::Rooms,
        Field::Adults,
        Field::Children,
        Field::SpecialRequests,
        Field::CompanyName,
        Field::LeaderName,
        Field::BillingAddress,
        Field::DirectNumber,
        Field::CardHolderName,
        Field::CardType,
        Field::CardNumber,
        Field::CardExpiry,
        Field::Cvv,
        Field::TodaysDate,
        Field::TermsAccepted,
        Field::FormAccessedAt,
    ];

    /// Canonical key used in the normalized record and in templates.
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::PropertyName => "property_name",
            Field::CheckIn => "check_in",
            Field::CheckOut => "check_out",
            Field::Rooms => "rooms",
            Field::Adults => "adults",
            Field::Children => "children",
            Field::SpecialRequests => "special_requests",
            Field::CompanyName => "company_name",
            Field::LeaderName => "leader_name",
            Field::BillingAddress => "billing_address",
            Field::DirectNumber => "direct_number",
            Field::CardHolderName => "card_holder_name",
            Field::CardType => "card_type",
            Field::CardNumber => "card_number",
            Field::CardExpiry => "card_expiry",
            Field::Cvv => "cvv",
            Field::TodaysDate => "todays_date",
            Field::TermsAccepted => "terms_accepted",
            Field::FormAccessedAt => "form_accessed_at",
        }
    }

    /// Human-readable label for documents and email bodies.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Phone => "Phone",
            Field::Email => "Email",
            Field::PropertyName => "Property",
            Field::CheckIn => "Check-in Date",
            Field::CheckOut => "Check-out Date",
            Field::Rooms => "Number of Rooms",
            Field::Adults => "Adults",
            Field::Children => "Children",
            Field::SpecialRequests => "Special Requests",
            Field::CompanyName => "Company Name",
            Field::LeaderName => "Leader Name",
            Field::BillingAddress => "Billing Address",
            Field::DirectNumber => "Direct Number",
            Field::CardHolderName => "Card Holder Name",
            Field::CardType => "Card Type",
            Field::CardNumber => "Card Number",
            Field::CardExpiry => "Expiration Date",
            Field::Cvv => "CVV",
            Field::TodaysDate => "Today's Date",
            Field::TermsAccepted => "Terms Accepted",
            Field::FormAccessedAt => "Form Accessed At",
        }
    }

    /// Accepted form names, in priority order.
    ///
    /// `CheckIn`/`CheckOut` end with the bare `checkin`/`checkout` names that
    /// multi-guest forms also use per guest; a sequence there resolves to its
    /// first non-empty element.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::FirstName => &["firstName", "customerFirstName", "customer_first_name"],
            Field::LastName => &["lastName", "customerLastName", "customer_last_name"],
            Field::Phone => &["phone", "phoneNumber", "phone_number"],
            Field::Email => &["customerEmail", "email"],
            Field::PropertyName => &["property_name", "propertyName", "hotel_name"],
            Field::CheckIn => &["checkin_date", "checkIn", "checkin"],
            Field::CheckOut => &["checkout_date", "checkOut", "checkout"],
            Field::Rooms => &["rooms", "number_of_rooms"],
            Field::Adults => &["adults"],
            Field::Children => &["children"],
            Field::SpecialRequests => &["special_requests", "specialRequests", "notes"],
            Field::CompanyName => &["company_name", "companyName"],
            Field::LeaderName => &["leader_name", "leaderName"],
            Field::BillingAddress => &["billing_address", "billingAddress"],
            Field::DirectNumber => &["direct_number", "directNumber"],
            Field::CardHolderName => &["card_holder_name", "cardHolderName"],
            Field::CardType => &["card_type", "cardType"],
            Field::CardNumber => &["card_number", "cardNumber"],
            Field::CardExpiry => &["expiration_date", "card_expiry", "expiry"],
            Field::Cvv => &["cvv", "cvc", "security_code"],
            Field::TodaysDate => &["todays_date", "todaysDate"],
            Field::TermsAccepted => &["terms_accepted", "termsAccepted", "terms"],
            Field::FormAccessedAt => &["form_accessed_at", "formAccessedAt"],
        }
    }
}

/// The four parallel arrays a multi-guest booking posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestRole {
    FirstName,
    LastName,
    CheckIn,
    CheckOut,
}

impl GuestRole {
    pub const ALL: [GuestRole; 4] = [
        GuestRole::FirstName,
        GuestRole::LastName,
        GuestRole::CheckIn,
        GuestRole::CheckOut,
    ];

    /// Key of the sequence in the normalized record.
    pub fn key(self) -> &'static str {
        match self {
            GuestRole::FirstName => "guests.first_name",
            GuestRole::LastName => "guests.last_name",
            GuestRole::CheckIn => "guests.check_in",
            GuestRole::CheckOut => "guests.check_out",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            GuestRole::FirstName => &["first_name", "guest_first_name"],
            GuestRole::LastName => &["last_name", "guest_last_name"],
            GuestRole::CheckIn => &["guest_checkin", "checkin"],
            GuestRole::CheckOut => &["guest_checkout", "checkout"],
        }
    }
}
