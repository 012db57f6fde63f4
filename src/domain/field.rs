use std::fmt;

use super::user::User;

/// A field of the nested address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Street,
    Suite,
    City,
    Zipcode,
}

/// An editable field of a user draft.
///
/// Address fields are addressed through [`UserField::Address`] so a change
/// can only ever touch one nested value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Name,
    Username,
    Email,
    Phone,
    Website,
    Address(AddressField),
}

impl AddressField {
    fn key(self) -> &'static str {
        match self {
            AddressField::Street => "street",
            AddressField::Suite => "suite",
            AddressField::City => "city",
            AddressField::Zipcode => "zipcode",
        }
    }

    /// Form placeholder shown for this field.
    pub fn label(self) -> &'static str {
        match self {
            AddressField::Street => "Street",
            AddressField::Suite => "Suite",
            AddressField::City => "City",
            AddressField::Zipcode => "Zipcode",
        }
    }
}

impl UserField {
    /// Every editable field in form order: the top-level fields, then the address.
    pub const FORM: [UserField; 9] = [
        UserField::Name,
        UserField::Username,
        UserField::Email,
        UserField::Phone,
        UserField::Website,
        UserField::Address(AddressField::Street),
        UserField::Address(AddressField::Suite),
        UserField::Address(AddressField::City),
        UserField::Address(AddressField::Zipcode),
    ];

    pub fn is_address(self) -> bool {
        matches!(self, UserField::Address(_))
    }

    /// Form placeholder shown for this field.
    pub fn label(self) -> &'static str {
        match self {
            UserField::Name => "Name",
            UserField::Username => "Username",
            UserField::Email => "Email",
            UserField::Phone => "Phone",
            UserField::Website => "Website",
            UserField::Address(field) => field.label(),
        }
    }

    /// Reads the value this field addresses.
    pub fn get(self, user: &User) -> &str {
        match self {
            UserField::Name => &user.name,
            UserField::Username => &user.username,
            UserField::Email => &user.email,
            UserField::Phone => &user.phone,
            UserField::Website => &user.website,
            UserField::Address(AddressField::Street) => &user.address.street,
            UserField::Address(AddressField::Suite) => &user.address.suite,
            UserField::Address(AddressField::City) => &user.address.city,
            UserField::Address(AddressField::Zipcode) => &user.address.zipcode,
        }
    }

    /// Overwrites the value this field addresses and nothing else.
    pub fn set(self, user: &mut User, value: String) {
        let slot = match self {
            UserField::Name => &mut user.name,
            UserField::Username => &mut user.username,
            UserField::Email => &mut user.email,
            UserField::Phone => &mut user.phone,
            UserField::Website => &mut user.website,
            UserField::Address(AddressField::Street) => &mut user.address.street,
            UserField::Address(AddressField::Suite) => &mut user.address.suite,
            UserField::Address(AddressField::City) => &mut user.address.city,
            UserField::Address(AddressField::Zipcode) => &mut user.address.zipcode,
        };
        *slot = value;
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserField::Name => f.write_str("name"),
            UserField::Username => f.write_str("username"),
            UserField::Email => f.write_str("email"),
            UserField::Phone => f.write_str("phone"),
            UserField::Website => f.write_str("website"),
            UserField::Address(field) => write!(f, "address.{}", field.key()),
        }
    }
}
