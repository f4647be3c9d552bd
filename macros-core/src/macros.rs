/// Parses a keyword-like identifier, failing the parse on any other token.
#[macro_export]
macro_rules! parse_ident {
    ($input:ident, $value:expr) => {
        let ident = $input.parse::<::syn::Ident>()?;
        if ident != $value {
            return Err(::syn::Error::new(
                ident.span(),
                format!("expected `{}`, found `{}`", $value, ident),
            ));
        }
    };
}
