//! Candidate selection
//!
//! Arity filtering first (with and without a detected trailing options
//! argument) so that a unique arity match never pays for the general
//! algorithm; otherwise coerce against every candidate in non-loose mode
//! and keep the unique non-dominated survivor.

use lib_abi_types::{DataType, MethodSignature, TxOptions, UserDefinedTypes, Value, ValuePayload, WrappedValue};

use crate::error::{OverloadError, OverloadResult, WrapError};
use crate::options::WrapOptions;
use crate::resolver::Resolver;
use crate::wrap::tx_options::is_options_shaped;
use crate::wrap::{wrap, wrap_multiple};

use super::order::arguments_at_least_as_specific;

/// A resolved call: the chosen signature with coerced arguments and any
/// extracted transaction options
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Index of the chosen candidate in the input list
    pub index: usize,
    /// The chosen signature
    pub signature: MethodSignature,
    /// Arguments coerced against the chosen signature, in order
    pub arguments: Vec<WrappedValue>,
    /// Trailing transaction options, if detected; empty otherwise
    pub options: TxOptions,
}

/// One arity-compatible way of reading the argument list
#[derive(Debug, Clone, Copy)]
struct CandidateForm {
    index: usize,
    with_options: bool,
}

/// Select the unique best-matching signature for `args`.
pub fn resolve_overloads(
    candidates: &[MethodSignature],
    args: &[Value],
    user_types: &UserDefinedTypes,
    resolver: &mut dyn Resolver,
    allow_options_junk: bool,
) -> OverloadResult<Resolution> {
    let method_name = candidates
        .first()
        .map(|candidate| candidate.name.clone())
        .unwrap_or_else(|| "<method>".to_string());

    let options_detected = args
        .last()
        .map(|last| is_options_shaped(last, allow_options_junk))
        .unwrap_or(false);

    let mut forms: Vec<CandidateForm> = Vec::new();
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.inputs.len() == args.len() {
            forms.push(CandidateForm {
                index,
                with_options: false,
            });
        }
        if options_detected && candidate.inputs.len() + 1 == args.len() {
            forms.push(CandidateForm {
                index,
                with_options: true,
            });
        }
    }
    tracing::debug!(
        "overload {}: {} of {} candidates match on arity (options {})",
        method_name,
        forms.len(),
        candidates.len(),
        if options_detected { "detected" } else { "absent" }
    );

    if forms.is_empty() {
        return Err(OverloadError::NoMatchingCandidate {
            name: method_name,
            failures: Vec::new(),
        });
    }

    // Coerce against each arity-compatible candidate in non-loose mode
    let mut survivors: Vec<(CandidateForm, Vec<WrappedValue>)> = Vec::new();
    let mut failures: Vec<WrapError> = Vec::new();
    for form in forms {
        let candidate = &candidates[form.index];
        let plain_args = if form.with_options {
            &args[..args.len() - 1]
        } else {
            args
        };
        let input_types = candidate.input_types();
        let mut wrap_opts = WrapOptions::named(user_types, "arguments");
        wrap_opts.allow_options_junk = allow_options_junk;
        match wrap_multiple(&input_types, plain_args, &wrap_opts, resolver) {
            Ok(wrapped) => survivors.push((form, wrapped)),
            Err(error @ WrapError::TypeMismatch { .. }) => failures.push(error),
            Err(fatal) => return Err(OverloadError::Wrap(fatal)),
        }
    }

    if survivors.is_empty() {
        return Err(OverloadError::NoMatchingCandidate {
            name: method_name,
            failures,
        });
    }

    // Drop candidates strictly dominated by another survivor
    let best: Vec<&(CandidateForm, Vec<WrappedValue>)> = survivors
        .iter()
        .filter(|(form, _)| {
            let own_types = candidates[form.index].input_types();
            !survivors.iter().any(|(other, _)| {
                if other.index == form.index && other.with_options == form.with_options {
                    return false;
                }
                let other_types = candidates[other.index].input_types();
                arguments_at_least_as_specific(&other_types, &own_types, user_types)
                    && !arguments_at_least_as_specific(&own_types, &other_types, user_types)
            })
        })
        .collect();

    match best.as_slice() {
        [] => Err(OverloadError::NoMatchingCandidate {
            name: method_name,
            failures,
        }),
        [(form, wrapped)] => {
            let options = match (form.with_options, args.last()) {
                (true, Some(last)) => {
                    let mut wrap_opts = WrapOptions::named(user_types, "options");
                    wrap_opts.allow_options_junk = allow_options_junk;
                    match wrap(&DataType::Options, last, &wrap_opts, resolver) {
                        Ok(WrappedValue {
                            value: ValuePayload::Options(options),
                            ..
                        }) => options,
                        Ok(_) => TxOptions::default(),
                        Err(error @ WrapError::TypeMismatch { .. }) => {
                            failures.push(error);
                            return Err(OverloadError::NoMatchingCandidate {
                                name: method_name,
                                failures,
                            });
                        }
                        Err(fatal) => return Err(OverloadError::Wrap(fatal)),
                    }
                }
                _ => TxOptions::default(),
            };
            tracing::debug!(
                "overload {}: selected candidate {} ({})",
                method_name,
                form.index,
                candidates[form.index]
            );
            Ok(Resolution {
                index: form.index,
                signature: candidates[form.index].clone(),
                arguments: wrapped.clone(),
                options,
            })
        }
        many => Err(OverloadError::NoUniqueBestCandidate {
            name: method_name,
            matching: many
                .iter()
                .map(|(form, _)| candidates[form.index].clone())
                .collect(),
        }),
    }
}
