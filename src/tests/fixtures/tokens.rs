pub const SUPER_USER_TOKEN: &str = "0123456789abcdef0123456789abcdef";

pub const OTHER_TOKEN: &str = "ffffffffffffffffffffffffffffffff";
