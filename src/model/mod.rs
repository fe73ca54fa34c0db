/// Stores a strum-backed enum in a VARCHAR column.
macro_rules! string_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::MySql> for $ty {
            fn type_info() -> sqlx::mysql::MySqlTypeInfo {
                <str as sqlx::Type<sqlx::MySql>>::type_info()
            }

            fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
                <str as sqlx::Type<sqlx::MySql>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::MySql> for $ty {
            fn encode_by_ref(&self, buf: &mut Vec<u8>) -> sqlx::encode::IsNull {
                let s: &str = self.as_ref();
                <&str as sqlx::Encode<'q, sqlx::MySql>>::encode_by_ref(&s, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::MySql> for $ty {
            fn decode(
                value: sqlx::mysql::MySqlValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<'r, sqlx::MySql>>::decode(value)?;
                s.parse::<$ty>().map_err(Into::into)
            }
        }
    };
}

pub(crate) use string_column;

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod leave_type;
pub mod role;
