//! `setendpoint`: update a service endpoint's URL, data, or credentials.

use url::Url;
use uuid::Uuid;

use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::{CommandError, Result};
use crate::model::Command;

use super::{require, require_data};

const NAME: &str = "setendpoint";

const ID: &str = "id";
const FIELD: &str = "field";
const KEY: &str = "key";
const DATA: &str = "data";

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: NAME,
    aliases: &[],
    allowed_in_restricted_mode: false,
};

/// The part of an endpoint a command writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Data,
    Auth,
}

impl Field {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("url") {
            Some(Self::Url)
        } else if s.eq_ignore_ascii_case("dataParameter") {
            Some(Self::Data)
        } else if s.eq_ignore_ascii_case("authParameter") {
            Some(Self::Auth)
        } else {
            None
        }
    }
}

pub struct SetEndpointCommand;

impl WorkerCommand for SetEndpointCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let data = require_data(command, NAME)?;
        let field_text = require(command, NAME, FIELD)?;
        let field = Field::parse(field_text);

        // Masked before anything below can fail and echo the value.
        if field == Some(Field::Auth) {
            scope.context.mask_secret(data);
        }

        let id_text = require(command, NAME, ID)?;
        let id = Uuid::parse_str(id_text).map_err(|e| CommandError::InvalidValue {
            command: NAME,
            property: ID,
            reason: e.to_string(),
        })?;
        let endpoint = scope
            .context
            .endpoint_mut(id)
            .ok_or(CommandError::UnknownEndpoint(id))?;

        if field == Some(Field::Url) {
            let url = Url::parse(data).map_err(|e| CommandError::InvalidValue {
                command: NAME,
                property: DATA,
                reason: format!("not an absolute URL: {e}"),
            })?;
            endpoint.url = Some(url);
            return Ok(());
        }

        let key = require(command, NAME, KEY)?;
        match field {
            Some(Field::Data) => {
                endpoint.data.insert(key.to_string(), data.to_string());
            }
            Some(Field::Auth) => {
                endpoint
                    .auth_parameters
                    .insert(key.to_string(), data.to_string());
            }
            _ => return Err(CommandError::InvalidEndpointField(field_text.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::commands::test_support::execute;
    use crate::context::MemoryContext;
    use crate::error::ErrorKind;
    use crate::model::Endpoint;

    fn ctx_with_endpoint() -> (MemoryContext, Uuid) {
        let id = Uuid::new_v4();
        let mut ctx = MemoryContext::new();
        let mut endpoint = Endpoint::new(id);
        endpoint.url = Some(Url::parse("https://old.example.com/").unwrap());
        ctx.endpoints.push(endpoint);
        (ctx, id)
    }

    fn set(id: &str, field: &str, data: &str) -> Command {
        Command::new(NAME)
            .with_property(ID, id)
            .with_property(FIELD, field)
            .with_data(data)
    }

    #[test]
    fn updates_url() {
        let (mut ctx, id) = ctx_with_endpoint();
        let cmd = set(&id.to_string(), "url", "https://example.com");
        execute(&SetEndpointCommand, &mut ctx, &cmd).unwrap();
        assert_eq!(
            ctx.endpoint(id).unwrap().url.as_ref().map(Url::as_str),
            Some("https://example.com/")
        );
    }

    #[test]
    fn invalid_url_leaves_endpoint_unchanged() {
        let (mut ctx, id) = ctx_with_endpoint();
        let cmd = set(&id.to_string(), "url", "not-a-uri");
        let err = execute(&SetEndpointCommand, &mut ctx, &cmd).unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidValue { property: DATA, .. }
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(
            ctx.endpoint(id).unwrap().url.as_ref().map(Url::as_str),
            Some("https://old.example.com/")
        );
    }

    #[test]
    fn writes_data_and_auth_parameters() {
        let (mut ctx, id) = ctx_with_endpoint();
        let data = set(&id.to_string(), "dataParameter", "eastus").with_property(KEY, "region");
        execute(&SetEndpointCommand, &mut ctx, &data).unwrap();
        let auth = set(&id.to_string(), "AUTHPARAMETER", "hunter2").with_property(KEY, "password");
        execute(&SetEndpointCommand, &mut ctx, &auth).unwrap();

        let endpoint = ctx.endpoint(id).unwrap();
        assert_eq!(endpoint.data["region"], "eastus");
        assert_eq!(endpoint.auth_parameters["password"], "hunter2");
        assert_eq!(ctx.masker.mask("hunter2"), "***");
        assert_eq!(ctx.masker.mask("eastus"), "eastus");
    }

    #[test]
    fn auth_value_masked_even_when_validation_fails() {
        let mut ctx = MemoryContext::new();
        let cmd = set("not-a-guid", "authParameter", "topsecret");
        assert!(execute(&SetEndpointCommand, &mut ctx, &cmd).is_err());
        assert_eq!(ctx.masker.mask("topsecret"), "***");
    }

    #[test]
    fn unknown_endpoint_fails() {
        let (mut ctx, _) = ctx_with_endpoint();
        let other = Uuid::new_v4();
        let cmd = set(&other.to_string(), "url", "https://example.com");
        let err = execute(&SetEndpointCommand, &mut ctx, &cmd).unwrap_err();
        assert!(matches!(err, CommandError::UnknownEndpoint(id) if id == other));
    }

    #[test]
    fn key_required_for_parameters() {
        let (mut ctx, id) = ctx_with_endpoint();
        let cmd = set(&id.to_string(), "dataParameter", "v");
        let err = execute(&SetEndpointCommand, &mut ctx, &cmd).unwrap_err();
        assert!(matches!(
            err,
            CommandError::MissingProperty { property: KEY, .. }
        ));
    }

    #[test]
    fn unknown_field_rejected() {
        let (mut ctx, id) = ctx_with_endpoint();
        let cmd = set(&id.to_string(), "scheme", "v").with_property(KEY, "k");
        let err = execute(&SetEndpointCommand, &mut ctx, &cmd).unwrap_err();
        assert!(matches!(err, CommandError::InvalidEndpointField(f) if f == "scheme"));
    }

    #[test]
    fn data_and_field_required() {
        let (mut ctx, id) = ctx_with_endpoint();
        let err = execute(&SetEndpointCommand, &mut ctx, &set(&id.to_string(), "url", ""))
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingData(NAME)));

        let err = execute(&SetEndpointCommand, &mut ctx, &set(&id.to_string(), "", "x"))
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::MissingProperty { property: FIELD, .. }
        ));
    }
}
