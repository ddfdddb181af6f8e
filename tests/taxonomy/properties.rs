//! Property tests for taxonomy resolution

use extmodel_taxonomy::{ErrorTaxonomy, ErrorTypeDefinition};
use proptest::prelude::*;

proptest! {
    /// A linear chain of `n` declared types resolves with every type
    /// reachable and depth equal to its distance from `ANY`.
    #[test]
    fn linear_chain_depths(n in 1usize..20) {
        let definitions: Vec<_> = (0..n)
            .map(|i| {
                let definition = ErrorTypeDefinition::new(format!("T{i}"));
                if i == 0 {
                    definition
                } else {
                    definition.with_declared_parent(format!("T{}", i - 1))
                }
            })
            .collect();

        let taxonomy = ErrorTaxonomy::resolve("chain", definitions).unwrap();
        prop_assert_eq!(taxonomy.declared_models().len(), n + 1);
        for i in 0..n {
            let model = taxonomy.lookup(&format!("T{i}")).unwrap();
            prop_assert_eq!(model.depth(), i + 1);
        }
    }

    /// Closing any chain into a loop is always rejected.
    #[test]
    fn closed_chain_rejected(n in 1usize..10) {
        let definitions: Vec<_> = (0..n)
            .map(|i| ErrorTypeDefinition::new(format!("T{i}")).with_declared_parent(format!("T{}", (i + 1) % n)))
            .collect();
        prop_assert!(ErrorTaxonomy::resolve("loop", definitions).is_err());
    }
}
