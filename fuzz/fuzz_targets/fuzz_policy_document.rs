#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use static_iam_plugin::{CredentialTable, PolicyDocument, check_access};

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = PolicyDocument::parse(data) else {
        return;
    };

    // Every source resolves to its own variable name.
    let secrets: HashMap<String, String> = doc
        .subjects
        .iter()
        .flat_map(|s| &s.tokens)
        .map(|t| (t.env_var.clone(), t.env_var.clone()))
        .collect();

    let Ok(table) = CredentialTable::build(doc.clone(), &secrets) else {
        return;
    };

    for subject in &doc.subjects {
        for token in &subject.tokens {
            let found = table
                .authenticate(&token.env_var)
                .expect("resolved credential must authenticate");
            assert_eq!(found.id, subject.id);
        }
        for resource in &subject.resources {
            for action in &resource.actions {
                assert!(check_access(subject, action, &resource.id));
            }
        }
    }
});
