use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{parse_macro_input, parse_quote, Ident, ImplItemFn, Stmt};

/// This macro is added before a round action of the `Table` struct in the impl block.
/// Use this macro to first check if current game phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(AwaitingDecision)]` will make a method first check
/// if current game phase is `AwaitingDecision`. If not, the method returns
/// `ActionError::WrongPhase` before any state is touched.
///
/// The expansion refers to `GamePhase` and `ActionError` unqualified, so both must be
/// in scope where the attribute is used.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream, item: TokenStream) -> TokenStream {
    let phase = parse_macro_input!(attr as Ident);
    let mut ast = parse_macro_input!(item as ImplItemFn);
    let action = ast.sig.ident.to_string();

    let early_return: Stmt = parse_quote! {
        if self.phase != GamePhase::#phase {
            ::log::debug!("{} ignored during {:?} phase", #action, self.phase);
            return Err(ActionError::WrongPhase {
                action: #action,
                phase: self.phase,
            });
        }
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}
