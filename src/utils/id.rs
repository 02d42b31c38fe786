use crate::constants::CLIENT_ORDER_ID_LENGTH;

/// Generates a reference suitable for the `client_order_id` field of an order.
///
/// The id is built from uppercase English letters (`A-Z`) and digits (`0-9`)
/// using the `nanoid` crate, so it is URL safe and collision resistant.
///
/// # Examples
/// ```
/// use pandago_client::utils::id::client_order_id;
/// let id = client_order_id();
/// assert_eq!(id.len(), 24);
/// ```
pub fn client_order_id() -> String {
    let alphabet: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".chars().collect();
    nanoid::nanoid!(CLIENT_ORDER_ID_LENGTH, &alphabet)
}

/// Generates a unique `jti` for a client assertion
pub fn assertion_id() -> String {
    nanoid::nanoid!()
}
