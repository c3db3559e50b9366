//! The fill state machine.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use page_surface::value::js_truthy;
use page_surface::{ActionId, ElementHandle, FormPort, SurfaceError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::model::{FieldKind, FieldSpec, FormOptions, FormReport, ValidationReport};
use crate::tempo;

/// Time allowed for error UI to render before messages are harvested.
const VALIDATION_SETTLE: Duration = Duration::from_millis(500);

pub struct FormRunner {
    options: FormOptions,
}

impl FormRunner {
    pub fn new(options: FormOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Fill `fields` in caller order, accumulating errors instead of
    /// aborting, then optionally validate and submit. Submission only
    /// happens on a clean slate.
    pub async fn fill(
        &self,
        port: &dyn FormPort,
        form_selector: &str,
        fields: &[FieldSpec],
    ) -> FormReport {
        let action = ActionId::new();
        let started_at = Utc::now();
        let start = Instant::now();
        let mut errors: Vec<String> = Vec::new();

        info!(
            action = %action.0,
            form = form_selector,
            fields = fields.len(),
            submit = self.options.submit,
            "filling form"
        );

        // 1. Locate the form; nothing is attempted without it.
        if let Err(err) = port
            .wait_for_selector(form_selector, self.options.timeout)
            .await
        {
            errors.push(format!("Form not found: {}: {}", form_selector, err));
            return FormReport::finish(started_at, start, errors);
        }

        // 2. Fill every field; failures are field-scoped.
        for field in fields {
            if let Err(message) = self.fill_field(port, field).await {
                warn!(action = %action.0, field = %field.selector, "{}", message);
                errors.push(message);
            }
        }

        // 3. Caller-supplied validation inside the document context.
        if let Some(expression) = &self.options.validator {
            match self.run_validator(port, expression).await {
                Ok(verdict) if !verdict.valid => errors.extend(verdict.errors),
                Ok(_) => {}
                Err(err) => errors.push(format!("Custom validation failed: {}", err)),
            }
        }

        // 4. Submit only when requested and the slate is clean.
        if self.options.submit && errors.is_empty() {
            if let Err(message) = self.submit_and_confirm(port, form_selector).await {
                errors.push(message);
            }
        }

        let report = FormReport::finish(started_at, start, errors);
        info!(
            action = %action.0,
            success = report.success,
            errors = report.errors.len(),
            latency_ms = report.latency_ms,
            "form fill finished"
        );
        report
    }

    async fn fill_field(&self, port: &dyn FormPort, field: &FieldSpec) -> Result<(), String> {
        let handle = match port.query_one(&field.selector).await {
            Ok(Some(handle)) => handle,
            Ok(None) => return Err(format!("Field not found: {}", field.selector)),
            Err(err) => return Err(format!("Field not found: {}: {}", field.selector, err)),
        };

        let facts = port
            .facts(&handle)
            .await
            .map_err(|err| format!("Field probe failed: {}: {}", field.selector, err))?;
        let kind = classify(&facts);
        debug!(field = %field.selector, kind = ?kind, "field classified");

        self.apply_value(port, &handle, kind, &field.value)
            .await
            .map_err(|err| format!("Field {} ({:?}): {}", field.selector, kind, err))
    }

    async fn apply_value(
        &self,
        port: &dyn FormPort,
        handle: &ElementHandle,
        kind: FieldKind,
        value: &Value,
    ) -> Result<(), SurfaceError> {
        match kind {
            FieldKind::Select => port.select_value(handle, &text_of(value)).await,
            // Activation only: a falsy value leaves the control untouched.
            // Unchecking is outside this contract.
            FieldKind::Checkbox | FieldKind::Radio => {
                if js_truthy(value) {
                    port.click(handle).await
                } else {
                    Ok(())
                }
            }
            FieldKind::File => {
                let path = value
                    .as_str()
                    .ok_or_else(|| SurfaceError::Io("file value must be a path string".into()))?;
                port.attach_file(handle, Path::new(path)).await
            }
            FieldKind::Text => {
                let text = text_of(value);
                let delay = tempo::keystroke_delay(&text, self.options.per_key_delay);
                port.type_text(handle, &text, delay).await
            }
        }
    }

    async fn run_validator(
        &self,
        port: &dyn FormPort,
        expression: &str,
    ) -> Result<ValidationReport, SurfaceError> {
        let value = port.eval(expression).await?;
        Ok(parse_verdict(&value))
    }

    async fn submit_and_confirm(
        &self,
        port: &dyn FormPort,
        form_selector: &str,
    ) -> Result<(), String> {
        let script =
            submit_script(form_selector).map_err(|err| format!("Submit failed: {}", err))?;
        let value = port
            .eval(&script)
            .await
            .map_err(|err| format!("Submit failed: {}", err))?;

        match value.get("status").and_then(Value::as_str).unwrap_or("") {
            "missing" => {
                return Err(format!("Submit failed: form not found: {}", form_selector));
            }
            "error" => {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                return Err(format!("Submit failed: {}", message));
            }
            _ => {}
        }

        // Submission went out; an unconfirmed transition is its own error.
        port.wait_for_navigation(self.options.timeout)
            .await
            .map_err(|err| format!("Navigation after submit not confirmed: {}", err))
    }

    /// Click a trigger and collect whatever fields it reveals. Absence of
    /// dynamic fields is a valid outcome: timeouts and errors all collapse
    /// to an empty set.
    pub async fn reveal_fields(
        &self,
        port: &dyn FormPort,
        trigger_selector: &str,
        expect_selector: &str,
    ) -> Vec<ElementHandle> {
        let trigger = match port.query_one(trigger_selector).await {
            Ok(Some(handle)) => handle,
            Ok(None) | Err(_) => {
                debug!(trigger = trigger_selector, "reveal trigger absent");
                return Vec::new();
            }
        };
        if let Err(err) = port.click(&trigger).await {
            debug!(trigger = trigger_selector, error = %err, "reveal trigger click failed");
            return Vec::new();
        }
        if let Err(err) = port
            .wait_for_selector(expect_selector, self.options.timeout)
            .await
        {
            debug!(expect = expect_selector, error = %err, "no fields revealed");
            return Vec::new();
        }
        port.query_all(expect_selector).await.unwrap_or_default()
    }

    /// Force native constraint validation, let the error UI settle, then
    /// harvest the visible messages.
    pub async fn validation_messages(
        &self,
        port: &dyn FormPort,
        form_selector: &str,
        error_selector: &str,
    ) -> ValidationReport {
        let probe = match report_validity_script(form_selector) {
            Ok(script) => port.eval(&script).await,
            Err(err) => Err(err),
        };
        match probe {
            Ok(value) => {
                if value.get("status").and_then(Value::as_str) == Some("missing") {
                    return ValidationReport {
                        valid: false,
                        errors: vec![format!("Form not found: {}", form_selector)],
                    };
                }
            }
            Err(err) => {
                return ValidationReport {
                    valid: false,
                    errors: vec![format!("Validation probe failed: {}", err)],
                };
            }
        }

        port.pause(VALIDATION_SETTLE).await;

        let errors = match collect_messages(port, error_selector).await {
            Ok(messages) => messages,
            Err(err) => vec![format!("Message harvest failed: {}", err)],
        };
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

async fn collect_messages(
    port: &dyn FormPort,
    error_selector: &str,
) -> Result<Vec<String>, SurfaceError> {
    let script = collect_messages_script(error_selector)?;
    let value = port.eval(&script).await?;
    Ok(value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_verdict(value: &Value) -> ValidationReport {
    let valid = value.get("valid").and_then(Value::as_bool).unwrap_or(false);
    let errors = value
        .get("errors")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();
    ValidationReport { valid, errors }
}

fn encode_selector(selector: &str) -> Result<String, SurfaceError> {
    serde_json::to_string(selector)
        .map_err(|err| SurfaceError::Eval(format!("invalid selector encoding: {}", err)))
}

fn submit_script(form_selector: &str) -> Result<String, SurfaceError> {
    let selector = encode_selector(form_selector)?;
    Ok(format!(
        "(() => {{\n    const form = document.querySelector({selector});\n    if (!form) {{ return {{ status: 'missing' }}; }}\n    try {{\n        if (typeof form.requestSubmit === 'function') {{\n            form.requestSubmit();\n            return {{ status: 'requestSubmit' }};\n        }}\n        if (typeof form.submit === 'function') {{\n            form.submit();\n            return {{ status: 'submit' }};\n        }}\n        const keyDown = new KeyboardEvent('keydown', {{ key: 'Enter', bubbles: true }});\n        form.dispatchEvent(keyDown);\n        return {{ status: 'key' }};\n    }} catch (err) {{\n        return {{ status: 'error', message: String(err) }};\n    }}\n}})()",
        selector = selector,
    ))
}

fn report_validity_script(form_selector: &str) -> Result<String, SurfaceError> {
    let selector = encode_selector(form_selector)?;
    Ok(format!(
        "(() => {{\n    const form = document.querySelector({selector});\n    if (!form) {{ return {{ status: 'missing' }}; }}\n    if (typeof form.reportValidity === 'function') {{\n        form.reportValidity();\n    }}\n    return {{ status: 'ok' }};\n}})()",
        selector = selector,
    ))
}

fn collect_messages_script(error_selector: &str) -> Result<String, SurfaceError> {
    let selector = encode_selector(error_selector)?;
    Ok(format!(
        "(() => Array.from(document.querySelectorAll({selector}))\n    .map((el) => (el.textContent || '').trim())\n    .filter((text) => text.length > 0))()",
        selector = selector,
    ))
}
