//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper for `#[graphql(with = ..)]` attributes, representing a scalar
/// through its domain type `D`.
///
/// Output goes through the [`Display`] impl of `D`, input through its
/// [`FromStr`] impl. The scalar type itself must implement `AsRef<D>` and
/// `TryFrom<D>`.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Through<D>(PhantomData<D>);

impl<D> Through<D> {
    /// Renders the scalar as a string [`Value`], via the [`Display`] impl of
    /// its domain type `D`.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        D: fmt::Display,
        T: AsRef<D>,
        S: ScalarValue,
    {
        Value::scalar(value.as_ref().to_string())
    }

    /// Parses the scalar from a string [`InputValue`], via the [`FromStr`]
    /// impl of its domain type `D`.
    ///
    /// # Errors
    ///
    /// If the input value is not a string, or fails validation of the `D`
    /// domain type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        D: FromStr + fmt::Display,
        D::Err: fmt::Display,
        T: TryFrom<D> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).expect("`GraphQLType` always has a name");
        let Some(s) = input.as_string_value() else {
            return Err(format!(
                "Expected a string value for the `{name}` scalar, \
                 found: {input}",
            ));
        };
        let parsed = s.parse::<D>().map_err(|e| {
            format!("Invalid `{name}` scalar \"{s}\": {e}")
        })?;
        parsed
            .try_into()
            .map_err(|e| format!("Invalid `{name}` scalar: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`] one.
    ///
    /// # Errors
    ///
    /// If the token is not a string token.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}
