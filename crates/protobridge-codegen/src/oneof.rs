//! Oneof case accessor generation
//!
//! Each oneof gets a `#[repr(u32)]` case enum in the message's `Msg_` module,
//! with one variant per member (valued by field number) plus `NotSet = 0`, and
//! a `x_case()` accessor in every context backed by a single `case` thunk.

use crate::accessors::claim_methods;
use crate::context::Context;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::{EntryPoint, ThunkOp, rs_ident, to_pascal_case};
use crate::schema::{MessageInfo, OneofSchema};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct OneofPlan<'s> {
    pub oneof: &'s OneofSchema,
    /// e.g. `ChoiceCase`
    pub case_enum: String,
    /// Variant name and field number of each member, in declaration order
    pub variants: Vec<(String, u32)>,
    pub case_thunk: String,
}

#[derive(Debug, Default)]
pub struct OneofCode {
    pub case_enum: String,
    pub view: String,
    pub mutator: String,
    pub owner: String,
    pub externs: String,
}

/// Plan the case enum and accessor of `oneof`.
///
/// `module_items` holds the names already defined in the message's `Msg_`
/// module. A case enum that would clash with one of them, or variants that
/// clash with each other, make the schema invalid. An accessor name that
/// clashes with another method is skipped with a diagnostic.
pub fn plan_oneof<'s>(
    ctx: &Context<'_>,
    info: &MessageInfo<'s>,
    oneof: &'s OneofSchema,
    taken: &mut BTreeSet<String>,
    module_items: &mut BTreeSet<String>,
) -> CodegenResult<Option<OneofPlan<'s>>> {
    let case_enum = format!("{}Case", to_pascal_case(&oneof.name));
    if !module_items.insert(case_enum.clone()) {
        return Err(CodegenError::InvalidSchema(format!(
            "case enum `{case_enum}` of oneof `{}.{}` clashes with another item of `{}_`",
            info.full_name,
            oneof.name,
            info.name()
        )));
    }

    let mut seen = BTreeSet::from(["NotSet".to_string()]);
    let mut variants = Vec::with_capacity(oneof.fields.len());
    for member in &oneof.fields {
        let variant = to_pascal_case(member);
        if !seen.insert(variant.clone()) {
            return Err(CodegenError::InvalidSchema(format!(
                "oneof `{}.{}` has two members named `{variant}` once converted to PascalCase",
                info.full_name, oneof.name
            )));
        }
        let Some(field) = info.schema.fields.iter().find(|f| &f.name == member) else {
            return Err(CodegenError::InvalidSchema(format!(
                "oneof `{}.{}` names unknown field `{member}`",
                info.full_name, oneof.name
            )));
        };
        variants.push((variant, field.number));
    }

    let accessor = format!("{}_case", oneof.name);
    if let Err(clash) = claim_methods(taken, std::slice::from_ref(&accessor)) {
        ctx.skip(
            &format!("{}.{}", info.full_name, oneof.name),
            &format!("accessor `{clash}` clashes with another generated method"),
        );
        return Ok(None);
    }

    let case_thunk = ctx.thunk(EntryPoint::member(
        &info.full_name,
        &oneof.name,
        ThunkOp::Case,
    ))?;

    Ok(Some(OneofPlan {
        oneof,
        case_enum,
        variants,
        case_thunk,
    }))
}

/// Render the case enum, accessors and foreign declaration of a planned oneof
pub fn emit_oneof(
    ctx: &Context<'_>,
    info: &MessageInfo<'_>,
    plan: &OneofPlan<'_>,
) -> CodegenResult<OneofCode> {
    let case_fn = rs_ident(&format!("{}_case", plan.oneof.name));
    let case_path = ctx.type_path(&format!("{}_::{}", info.rust_path, plan.case_enum));

    let mut variants = String::new();
    let mut arms = String::new();
    for (variant, number) in &plan.variants {
        variants.push_str(&format!("{variant} = {number},\n"));
        arms.push_str(&format!("{number} => Self::{variant},\n"));
    }

    let vars = [
        ("Case", plan.case_enum.as_str()),
        ("CasePath", case_path.as_str()),
        ("case_fn", case_fn.as_str()),
        ("case_thunk", plan.case_thunk.as_str()),
        ("oneof", plan.oneof.name.as_str()),
        ("variants", variants.as_str()),
        ("arms", arms.as_str()),
    ];

    let case_enum = ctx.render(
        r#"
            /// Which member of oneof `$oneof$` is set
            #[repr(u32)]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum $Case$ {
                $variants$
                NotSet = 0,
            }

            impl $Case$ {
                #[doc(hidden)]
                pub fn from_raw(_private: $pbi$::Private, raw: u32) -> Self {
                    match raw {
                        $arms$
                        _ => Self::NotSet,
                    }
                }
            }
        "#,
        &vars,
    )?;

    let view = ctx.render(
        r#"
            // oneof $oneof$
            pub fn $case_fn$(self) -> $CasePath$ {
                $CasePath$::from_raw($pbi$::Private, unsafe { $case_thunk$(self.msg) })
            }
        "#,
        &vars,
    )?;

    let mutator = ctx.render(
        r#"
            // oneof $oneof$
            pub fn $case_fn$(&self) -> $CasePath$ {
                $CasePath$::from_raw($pbi$::Private, unsafe { $case_thunk$(self.inner.msg()) })
            }
        "#,
        &vars,
    )?;

    let owner = ctx.render(
        r#"
            pub fn $case_fn$(&self) -> $CasePath$ {
                self.as_view().$case_fn$()
            }
        "#,
        &vars,
    )?;

    let externs = ctx.render(
        r#"
            fn $case_thunk$(raw_msg: $pbi$::RawMessage) -> u32;
        "#,
        &vars,
    )?;

    Ok(OneofCode {
        case_enum,
        view,
        mutator,
        owner,
        externs,
    })
}
