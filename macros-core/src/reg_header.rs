use syn::{
    parse::{Parse, ParseStream, Result},
    Attribute, Ident, Token, Visibility,
};

/// Register header: `pub mod BLOCK NAME;`.
#[allow(missing_docs)]
pub struct RegHeader {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub block: Ident,
    pub ident: Ident,
}

impl Parse for RegHeader {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![mod]>()?;
        let block = input.parse()?;
        let ident = input.parse()?;
        input.parse::<Token![;]>()?;
        Ok(Self { attrs, vis, block, ident })
    }
}

impl RegHeader {
    /// Returns the upper-case name of the register, `BLOCK_NAME`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.block, self.ident)
    }
}
