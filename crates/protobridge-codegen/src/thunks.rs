//! Native thunk emission for the heavy backend
//!
//! Every thunk declared on the Rust side gets a C++ definition here, from the
//! same plan and therefore with the same symbol. Thunks are thin `extern "C"`
//! wrappers around the native message class; serialization and parsing go
//! through the helpers in `protobridge/cpp_api.h`.

use crate::accessors::{FieldAccess, FieldPlan};
use crate::context::Context;
use crate::error::CodegenResult;
use crate::message::MessagePlan;
use crate::naming::{ThunkOp, cc_ident};
use crate::oneof::OneofPlan;

const API: &str = "::protobridge::rust_internal";

/// C++ thunks of `plan`, nested messages following their parent
pub fn emit_thunks(ctx: &Context<'_>, plan: &MessagePlan<'_>) -> CodegenResult<String> {
    let mut parts = vec![emit_message_thunks(ctx, plan)?];
    for field in &plan.fields {
        parts.push(emit_field_thunks(ctx, plan, field)?);
    }
    for oneof in &plan.oneofs {
        parts.push(emit_oneof_thunk(ctx, plan, oneof)?);
    }

    let mut out = ctx.render(
        r#"
            // clang-format off
            extern "C" {

            $body$

            }  // extern "C"
            // clang-format on
        "#,
        &[("body", parts.concat().as_str())],
    )?;

    for nested in &plan.nested {
        out.push('\n');
        out.push_str(&emit_thunks(ctx, nested)?);
    }
    Ok(out)
}

fn emit_message_thunks(ctx: &Context<'_>, plan: &MessagePlan<'_>) -> CodegenResult<String> {
    let mut out = ctx.render("// $name$", &[("name", plan.info.full_name.as_str())])?;
    for (op, thunk) in &plan.thunks {
        let template = match op {
            ThunkOp::New => "void* $thunk$() { return new $Q$(); }",
            ThunkOp::Delete => "void $thunk$(void* msg) { delete static_cast<$Q$*>(msg); }",
            ThunkOp::Serialize => {
                r#"
                    $api$::SerializedData $thunk$($Q$* msg) {
                      return $api$::SerializeMsg(msg);
                    }
                "#
            }
            ThunkOp::Deserialize => {
                r#"
                    bool $thunk$($Q$* msg, $api$::PtrAndLen data) {
                      return $api$::DeserializeMsg(msg, data);
                    }
                "#
            }
            _ => continue,
        };
        out.push_str(&ctx.render(
            template,
            &[
                ("thunk", thunk.as_str()),
                ("Q", plan.info.cc_name.as_str()),
                ("api", API),
            ],
        )?);
    }
    Ok(out)
}

fn emit_field_thunks(
    ctx: &Context<'_>,
    plan: &MessagePlan<'_>,
    field: &FieldPlan<'_>,
) -> CodegenResult<String> {
    let accessor = cc_ident(&field.field.name);
    let mut vars = vec![
        ("Q", plan.info.cc_name.as_str()),
        ("api", API),
        ("field", accessor.as_str()),
        ("getter_thunk", field.get.as_str()),
        ("clear_thunk", field.clear.as_str()),
    ];

    let template = match &field.access {
        FieldAccess::Scalar { ty, set } => {
            vars.extend([("ty", ty.cc_type()), ("setter_thunk", set.as_str())]);
            r#"
                $ty$ $getter_thunk$($Q$* msg) { return msg->$field$(); }
                void $setter_thunk$($Q$* msg, $ty$ val) { msg->set_$field$(val); }
                void $clear_thunk$($Q$* msg) { msg->clear_$field$(); }
            "#
        }
        FieldAccess::Text { set, .. } => {
            vars.push(("setter_thunk", set.as_str()));
            r#"
                $api$::PtrAndLen $getter_thunk$($Q$* msg) {
                  const auto& val = msg->$field$();
                  return $api$::PtrAndLen(val.data(), val.size());
                }
                void $setter_thunk$($Q$* msg, $api$::PtrAndLen val) {
                  msg->set_$field$(val.ToString());
                }
                void $clear_thunk$($Q$* msg) { msg->clear_$field$(); }
            "#
        }
        FieldAccess::Message { get_mut, .. } => {
            vars.push(("getter_mut_thunk", get_mut.as_str()));
            r#"
                const void* $getter_thunk$($Q$* msg) { return &msg->$field$(); }
                void* $getter_mut_thunk$($Q$* msg) { return msg->mutable_$field$(); }
                void $clear_thunk$($Q$* msg) { msg->clear_$field$(); }
            "#
        }
    };

    ctx.render(template, &vars)
}

fn emit_oneof_thunk(
    ctx: &Context<'_>,
    plan: &MessagePlan<'_>,
    oneof: &OneofPlan<'_>,
) -> CodegenResult<String> {
    let accessor = oneof.oneof.name.to_ascii_lowercase();
    ctx.render(
        r#"
            uint32_t $case_thunk$($Q$* msg) {
              return static_cast<uint32_t>(msg->$oneof$_case());
            }
        "#,
        &[
            ("Q", plan.info.cc_name.as_str()),
            ("case_thunk", oneof.case_thunk.as_str()),
            ("oneof", accessor.as_str()),
        ],
    )
}
