use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    errors::WardenError,
    matcher::Matcher,
    req::Request,
    statement::{Effect, Statement},
};

/// Policy decision engine consulted by the access-check endpoint.
#[automock]
#[async_trait]
pub trait Warden: Send + Sync {
    /// `Ok(())` grants the request. Any error means the request is not
    /// allowed.
    async fn is_allowed(&self, request: &Request) -> anyhow::Result<()>;

    /// Example of the request shape the engine understands.
    fn sample_request(&self) -> Request;
}

/// In-process warden over a fixed statement list.
///
/// A statement applies when its actions, subjects and resources all match.
/// Any applying `deny` statement rejects the request; otherwise at least one
/// applying `allow` statement is required.
pub struct StaticWarden<M> {
    matcher: M,
    statements: Vec<Statement>,
}

impl<M> StaticWarden<M> {
    pub fn new(matcher: M, statements: Vec<Statement>) -> Self {
        Self {
            matcher,
            statements,
        }
    }
}

impl<M: Matcher> StaticWarden<M> {
    pub fn evaluate(&self, input: &Request) -> Result<(), WardenError> {
        let mut allowed = false;
        for statement in self.statements.iter() {
            if !self.applies(statement, input)? {
                continue;
            }
            if let Effect::Deny = statement.effect {
                return Err(WardenError::Denied(statement.name()));
            }
            allowed = true;
        }
        if !allowed {
            return Err(WardenError::NoMatch);
        }
        Ok(())
    }

    fn applies(
        &self,
        statement: &Statement,
        input: &Request,
    ) -> Result<bool, WardenError> {
        let (start, end) =
            (statement.get_start_delimiter(), statement.get_end_delimiter());
        Ok(self
            .matcher
            .matches(start, end, &statement.actions, &input.action)?
            && self
                .matcher
                .matches(start, end, &statement.subjects, &input.subject)?
            && self.matcher.matches(
                start,
                end,
                &statement.resources,
                &input.resource,
            )?)
    }
}

impl<M> std::fmt::Debug for StaticWarden<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticWarden")
            .field("statements", &self.statements)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<M: Matcher + Send + Sync> Warden for StaticWarden<M> {
    async fn is_allowed(&self, request: &Request) -> anyhow::Result<()> {
        let verdict = self.evaluate(request);
        debug!(?request, ?verdict, "evaluated access request");
        Ok(verdict?)
    }

    fn sample_request(&self) -> Request {
        Request::sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::reg::Regexp;

    fn statement(effect: Effect, subjects: &[&str]) -> Statement {
        Statement {
            sid: Some(format!("{effect:?}-{}", subjects.join(","))),
            effect,
            subjects: subjects.iter().map(|s| (*s).to_owned()).collect(),
            actions: vec!["<create|delete>".to_owned(), "get".to_owned()],
            resources: vec!["myrn:some.domain.com:resource:<\\d+>".to_owned()],
        }
    }

    fn request(subject: &str, action: &str) -> Request {
        Request {
            resource: "myrn:some.domain.com:resource:123".to_owned(),
            action: action.to_owned(),
            subject: subject.to_owned(),
            ..Default::default()
        }
    }

    fn warden(statements: Vec<Statement>) -> StaticWarden<Regexp> {
        StaticWarden::new(Regexp::new(16).unwrap(), statements)
    }

    #[tokio::test]
    async fn allows_matching_statement() {
        let w = warden(vec![statement(Effect::Allow, &["max", "<zac|ken>"])]);
        assert!(w.is_allowed(&request("ken", "delete")).await.is_ok());
        assert!(w.is_allowed(&request("max", "get")).await.is_ok());
    }

    #[tokio::test]
    async fn no_match_is_denied() {
        let w = warden(vec![statement(Effect::Allow, &["max"])]);
        let err = w.is_allowed(&request("peter", "get")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WardenError>(),
            Some(WardenError::NoMatch)
        ));
        assert!(w.is_allowed(&request("max", "update")).await.is_err());
    }

    #[test]
    fn deny_overrides_allow() {
        let w = warden(vec![
            statement(Effect::Allow, &["<.*>"]),
            statement(Effect::Deny, &["peter"]),
        ]);
        assert!(w.evaluate(&request("max", "get")).is_ok());
        assert!(matches!(
            w.evaluate(&request("peter", "get")),
            Err(WardenError::Denied(sid)) if sid == "Deny-peter"
        ));
    }

    #[test]
    fn empty_policy_denies_everything() {
        let w = warden(Vec::new());
        assert!(matches!(
            w.evaluate(&Request::sample()),
            Err(WardenError::NoMatch)
        ));
        assert_eq!(w.sample_request(), Request::sample());
    }
}
