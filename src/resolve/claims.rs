//! Claims-to-header / claim / query mappings.

use std::collections::BTreeMap;

use crate::resolve::ResolveError;
use crate::routing::options::ClaimToThing;

pub trait ClaimsToThingResolver: Send + Sync {
    /// Parse `new key -> instruction` pairs, in key order.
    fn resolve(&self, instructions: &BTreeMap<String, String>)
        -> Result<Vec<ClaimToThing>, ResolveError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileClaimsToThingResolver;

impl ClaimsToThingResolver for FileClaimsToThingResolver {
    fn resolve(
        &self,
        instructions: &BTreeMap<String, String>,
    ) -> Result<Vec<ClaimToThing>, ResolveError> {
        instructions
            .iter()
            .map(|(key, instruction)| {
                ClaimToThing::parse(key, instruction).map_err(|source| ResolveError::Claim {
                    key: key.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::options::ClaimParseError;

    #[test]
    fn test_resolves_in_key_order() {
        let mut instructions = BTreeMap::new();
        instructions.insert("UserId".to_string(), "Claims[sub] > value[1] > |".to_string());
        instructions.insert("CustomerId".to_string(), "Claims[CustomerId] > value".to_string());

        let claims = FileClaimsToThingResolver.resolve(&instructions).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].new_key, "CustomerId");
        assert_eq!(claims[1].claim_key, "sub");
        assert_eq!(claims[1].index, 1);
    }

    #[test]
    fn test_bad_instruction_names_key() {
        let mut instructions = BTreeMap::new();
        instructions.insert("UserId".to_string(), "sub".to_string());

        let err = FileClaimsToThingResolver.resolve(&instructions).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Claim {
                key: "UserId".into(),
                source: ClaimParseError::MissingClaim("sub".into()),
            }
        );
    }
}
