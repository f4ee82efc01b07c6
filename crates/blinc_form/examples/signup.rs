//! Signup Form Demo
//!
//! A headless signup form validated by an object schema. Simulated user
//! input is fed through the form and the outbound callbacks log what a real
//! host would render.
//!
//! Run with: RUST_LOG=blinc_form=debug cargo run -p blinc_form --example signup

use anyhow::Result;
use blinc_form::prelude::*;
use blinc_form_schema::{ObjectSchema, StringSchema};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let user_schema = ObjectSchema::new()
        .field("name", StringSchema::new().min(2).max(30))
        .field("email", StringSchema::new().email());

    let form = Form::new(
        FormConfig::new()
            .validation_schema(user_schema)
            .on_submit(|data| tracing::info!(data = %data.to_json(), "form data"))
            .on_error(|errors| tracing::info!(errors = %errors.to_json(), "validation errors"))
            .on_form_change(|data| tracing::info!(data = %data.to_json(), "form changed")),
    );
    form.add_text_field("name")?;
    form.add_text_field("email")?;

    // First attempt: name too short, email malformed
    form.handle_event(FormEvent::input("name", "A"))?;
    form.handle_event(FormEvent::input("email", "not-an-email"))?;
    form.handle_event(FormEvent::Submit)?;
    form.render(print_errors);

    // Fix both fields and submit with Enter
    form.handle_event(FormEvent::input("name", "Ada Lovelace"))?;
    form.handle_event(FormEvent::input("email", "ada@example.com"))?;
    form.handle_event(FormEvent::key(Key::Enter))?;
    form.render(print_errors);

    // The owner can reset the form imperatively
    form.handle().reset_form();
    tracing::info!(name = ?form.field_value("name"), "after reset");

    Ok(())
}

fn print_errors(props: blinc_form::RenderProps<'_>) {
    for field in ["name", "email"] {
        match props.errors.message(field) {
            Some(message) => println!("{field}: {message}"),
            None => println!("{field}: ok"),
        }
    }
}
