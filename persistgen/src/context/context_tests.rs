//! Comprehensive tests for context module.

#[cfg(test)]
mod tests {
    use crate::adapters::{BuiltinAdapters, ColumnAffinity};
    use crate::converters::TypeName;
    use crate::diagnostics::{Severity, Warning};
    use crate::errors::ProcessorError;
    use crate::options::ProcessorOptions;
    use crate::rewrite::{RewriteKind, SelectQuery};
    use crate::testing::{
        assert_no_errors, assert_resolves_to, assert_warning_count, converter, song_schema,
        TestElement, TestRound,
    };
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn expanding() -> ProcessorOptions {
        ProcessorOptions::default().with_expand_projection(true)
    }

    #[test]
    fn test_root_context() {
        let round = TestRound::new();
        let root = round.root();

        assert_eq!(root.depth(), 0);
        assert!(root.element().is_none());
        assert!(root.converters().is_empty());
        assert!(root.suppressed_warnings().is_empty());
        assert!(root.database_verifier().is_none());
        assert!(!root.drops_unused_columns());
    }

    #[test]
    fn test_fork_sets_element_and_depth() {
        let round = TestRound::new();
        let child = round.root().fork(TestElement::new("SongDao").build());
        let grandchild = child.fork(TestElement::new("SongDao.all").build());

        assert_eq!(child.depth(), 1);
        assert_eq!(grandchild.depth(), 2);
        assert_eq!(grandchild.element().map(|e| e.name()), Some("SongDao.all"));
        assert_ne!(child.id(), grandchild.id());
        assert!(grandchild.cache().shares_store_with(round.root().cache()));
    }

    #[test]
    fn test_fork_without_converters_shares_resolver() {
        let round = TestRound::new();
        let root = round.root();
        let child = root.fork(TestElement::new("Song").build());

        assert!(child.shares_resolver_with(root));
        assert!(Arc::ptr_eq(
            &root.type_adapter_resolver(),
            &child.type_adapter_resolver()
        ));
        assert!(child.converters().shares_storage_with(root.converters()));
    }

    #[test]
    fn test_resolver_built_once() {
        let round = TestRound::new();
        let root = round.root();

        let first = root.type_adapter_resolver();
        let second = root.type_adapter_resolver();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_fork_with_converters_builds_own_resolver() {
        let round = TestRound::new();
        let root = round.root();
        let parent = root.fork(
            TestElement::new("MusicDatabase")
                .converter("DateToLong", "Date", "Long")
                .build(),
        );
        let child = parent.fork(
            TestElement::new("SongDao")
                .converter("DateToString", "Date", "String")
                .build(),
        );

        assert!(!parent.shares_resolver_with(root));
        assert!(!child.shares_resolver_with(&parent));
        assert!(!Arc::ptr_eq(
            &parent.type_adapter_resolver(),
            &child.type_adapter_resolver()
        ));

        assert_eq!(
            child.converters().descriptors(),
            &[
                converter("DateToString", "Date", "String"),
                converter("DateToLong", "Date", "Long"),
            ]
        );
        assert_resolves_to(&child, "Date", "String");
        assert_resolves_to(&parent, "Date", "Long");
    }

    #[test]
    fn test_inherited_converters_still_apply() {
        let round = TestRound::new();
        let parent = round.root().fork(
            TestElement::new("MusicDatabase")
                .converter("DateToLong", "Date", "Long")
                .build(),
        );
        let child = parent.fork(
            TestElement::new("SongDao")
                .converter("MoodToString", "Mood", "String")
                .build(),
        );

        assert_resolves_to(&child, "Date", "Long");
        assert_resolves_to(&child, "Mood", "String");
        assert!(parent.resolve_type(&TypeName::new("Mood")).is_err());
    }

    #[test]
    fn test_suppressions_grow_down_the_tree() {
        let round = TestRound::new();
        let parent = round.root().fork(
            TestElement::new("SongDao")
                .suppressing(Warning::CursorMismatch)
                .suppressing_key("NOT_A_WARNING")
                .build(),
        );
        let child = parent.fork_with_suppressions(
            TestElement::new("SongDao.all")
                .suppressing(Warning::QueryMismatch)
                .build(),
            &BTreeSet::from([Warning::AmbiguousColumnInResult]),
        );
        let grandchild = child.fork(TestElement::new("SongDao.all.result").build());

        assert_eq!(
            parent.suppressed_warnings(),
            &BTreeSet::from([Warning::CursorMismatch])
        );
        let expected = BTreeSet::from([
            Warning::CursorMismatch,
            Warning::QueryMismatch,
            Warning::AmbiguousColumnInResult,
        ]);
        assert_eq!(child.suppressed_warnings(), &expected);
        assert_eq!(grandchild.suppressed_warnings(), &expected);
    }

    #[test]
    fn test_suppressed_warning_is_dropped() {
        let round = TestRound::new();
        let child = round.root().fork(
            TestElement::new("SongDao")
                .suppressing(Warning::CursorMismatch)
                .build(),
        );

        child.logger().warn(Warning::CursorMismatch, None, "columns differ");
        child.logger().warn(Warning::QueryMismatch, None, "shape differs");

        assert_warning_count(round.collector(), Warning::CursorMismatch, 0);
        assert_warning_count(round.collector(), Warning::QueryMismatch, 1);
        assert_eq!(round.diagnostics()[0].element.as_deref(), Some("SongDao"));
    }

    #[test]
    fn test_drop_unused_columns_is_inherited() {
        let round = TestRound::new();
        let marked = round
            .root()
            .fork(TestElement::new("SongDao").dropping_unused_columns().build());
        let nested = marked.fork(TestElement::new("SongDao.all").build());

        assert!(!round.root().drops_unused_columns());
        assert!(marked.drops_unused_columns());
        assert!(nested.drops_unused_columns());
    }

    #[test]
    fn test_global_drop_unused_columns() {
        let round = TestRound::with_options(ProcessorOptions::default().with_drop_unused_columns(true));
        let child = round.root().fork(TestElement::new("SongDao").build());
        assert!(child.drops_unused_columns());
    }

    #[test]
    fn test_double_attachment_fails() {
        let mut round = TestRound::new();
        let root = round.root_mut();

        root.attach_database_verifier(song_schema()).unwrap();
        let err = root.attach_database_verifier(song_schema()).unwrap_err();

        assert!(matches!(
            err,
            ProcessorError::VerifierAlreadyAttached { context } if context == root.id()
        ));
        assert!(!err.is_element_fatal());
    }

    #[test]
    fn test_verifier_visible_to_later_forks_only() {
        let mut round = TestRound::new();
        let early = round.root().fork(TestElement::new("Early").build());

        let verifier = song_schema();
        round.root_mut().attach_database_verifier(Arc::clone(&verifier)).unwrap();
        let late = round.root().fork(TestElement::new("Late").build());
        let nested = late.fork(TestElement::new("Late.query").build());

        assert!(early.database_verifier().is_none());
        assert!(late
            .database_verifier()
            .is_some_and(|v| Arc::ptr_eq(v, &verifier)));
        assert!(nested.database_verifier().is_some());
    }

    #[test]
    fn test_child_attachment_does_not_reach_parent() {
        let round = TestRound::new();
        let mut child = round.root().fork(TestElement::new("MusicDatabase").build());

        child.attach_database_verifier(song_schema()).unwrap();

        assert!(child.database_verifier().is_some());
        assert!(round.root().database_verifier().is_none());
    }

    #[test]
    fn test_rewriter_recomputed_after_attachment() {
        let mut round = TestRound::with_options(expanding());
        assert_eq!(round.root().query_rewriter().kind(), RewriteKind::NoOp);

        round.root_mut().attach_database_verifier(song_schema()).unwrap();

        assert_eq!(
            round.root().query_rewriter().kind(),
            RewriteKind::ExpandProjection
        );
    }

    #[test]
    fn test_rewrite_truth_table_through_contexts() {
        for has_verifier in [false, true] {
            for drop_unused in [false, true] {
                for expand in [false, true] {
                    let options = ProcessorOptions::default().with_expand_projection(expand);
                    let mut round = TestRound::with_options(options);
                    if has_verifier {
                        round.root_mut().attach_database_verifier(song_schema()).unwrap();
                    }

                    let mut element = TestElement::new("SongDao").suppressing(Warning::All);
                    if drop_unused {
                        element = element.dropping_unused_columns();
                    }
                    let child = round.root().fork(element.build());

                    let expected = match (has_verifier, drop_unused, expand) {
                        (false, _, _) | (true, false, false) => RewriteKind::NoOp,
                        (true, true, _) => RewriteKind::RemoveUnusedColumns,
                        (true, false, true) => RewriteKind::ExpandProjection,
                    };
                    assert_eq!(
                        child.query_rewriter().kind(),
                        expected,
                        "verifier={has_verifier} drop_unused={drop_unused} expand={expand}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_collect_logs_isolates_diagnostics() {
        let round = TestRound::new();
        let child = round.root().fork(TestElement::new("SongDao").build());

        let (result, logs) = child.collect_logs(|sub| {
            sub.logger().warn(Warning::QueryMismatch, None, "speculative");
            sub.resolve_type(&TypeName::new("Playlist")).is_ok()
        });

        assert!(!result);
        assert_eq!(logs.len(), 2);
        assert!(logs.has_errors());
        assert_eq!(logs.diagnostics()[1].element.as_deref(), Some("SongDao"));
        assert!(round.diagnostics().is_empty());

        logs.replay_into(round.collector());
        assert_eq!(round.diagnostics().len(), 2);
    }

    #[test]
    fn test_collect_logs_reuses_resolver_and_cache() {
        let round = TestRound::new();
        let child = round.root().fork(
            TestElement::new("SongDao")
                .converter("MoodToString", "Mood", "String")
                .build(),
        );

        let ((shared, same_store), _) = child.collect_logs(|sub| {
            (
                sub.shares_resolver_with(&child),
                sub.cache().shares_store_with(child.cache()),
            )
        });

        assert!(shared);
        assert!(same_store);
    }

    #[test]
    fn test_collect_logs_keeps_suppressions() {
        let round = TestRound::new();
        let child = round.root().fork(
            TestElement::new("SongDao")
                .suppressing(Warning::CursorMismatch)
                .build(),
        );

        let ((), logs) = child.collect_logs(|sub| {
            sub.logger().warn(Warning::CursorMismatch, None, "dropped");
        });

        assert!(logs.is_empty());
    }

    #[test]
    fn test_collect_logs_attachment_stays_in_sub_context() {
        let round = TestRound::new();
        let child = round.root().fork(TestElement::new("MusicDatabase").build());

        let (attached, _) = child.collect_logs(|sub| {
            sub.attach_database_verifier(song_schema()).is_ok() && sub.database_verifier().is_some()
        });

        assert!(attached);
        assert!(child.database_verifier().is_none());
    }

    #[test]
    fn test_collect_logs_copies_verifier_down() {
        let mut round = TestRound::new();
        round.root_mut().attach_database_verifier(song_schema()).unwrap();

        let (result, _) = round.root().collect_logs(|sub| {
            let visible = sub.database_verifier().is_some();
            let second = sub.attach_database_verifier(song_schema());
            (visible, second.is_err())
        });

        assert_eq!(result, (true, true));
    }

    #[test]
    fn test_custom_converter_scenario() {
        let round = TestRound::new().with_defaults(
            BuiltinAdapters::empty()
                .with_column("Bar", ColumnAffinity::Text)
                .with_column("Baz", ColumnAffinity::Integer),
        );
        let child = round
            .root()
            .fork(TestElement::new("E1").converter("FooConverter", "Foo", "Bar").build());

        let foo = child.resolve_type(&TypeName::new("Foo")).unwrap();
        assert_eq!(foo.stored_type().as_str(), "Bar");
        assert_eq!(foo.steps().len(), 1);
        assert_eq!(foo.steps()[0].converter, "FooConverter");

        let baz = child.resolve_type(&TypeName::new("Baz")).unwrap();
        assert!(baz.is_direct());
        assert_eq!(baz.affinity(), ColumnAffinity::Integer);
        assert_eq!(baz, round.root().resolve_type(&TypeName::new("Baz")).unwrap());

        assert!(round.root().resolve_type(&TypeName::new("Foo")).is_err());
    }

    #[test]
    fn test_expand_projection_scenario() {
        let mut round = TestRound::with_options(expanding());
        let verifier = song_schema();
        round.root_mut().attach_database_verifier(Arc::clone(&verifier)).unwrap();

        let dao = round.root().fork(TestElement::new("SongDao").build());
        let rewriter = dao.query_rewriter();
        assert_eq!(rewriter.kind(), RewriteKind::ExpandProjection);
        assert!(rewriter.schema().is_some_and(|s| Arc::ptr_eq(s, &verifier)));

        let query = dao.fork(
            TestElement::new("SongDao.titles")
                .dropping_unused_columns()
                .build(),
        );
        assert_eq!(query.query_rewriter().kind(), RewriteKind::RemoveUnusedColumns);

        let warnings = round.warnings(Warning::ExpandProjectionWithDropUnusedColumns);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].element.as_deref(), Some("SongDao.titles"));
        assert_eq!(round.diagnostics().len(), 1);

        let rewritten = query
            .query_rewriter()
            .rewrite(&SelectQuery::star("Song"), &["title".to_string()]);
        assert_eq!(rewritten.sql, "SELECT `title` FROM (SELECT * FROM `Song`)");
    }

    #[test]
    fn test_conflict_warning_can_be_suppressed() {
        let round = TestRound::with_options(expanding());
        let child = round.root().fork(
            TestElement::new("SongDao")
                .dropping_unused_columns()
                .suppressing(Warning::ExpandProjectionWithDropUnusedColumns)
                .build(),
        );

        assert!(child.drops_unused_columns());
        assert!(round.diagnostics().is_empty());
    }

    #[test]
    fn test_unresolvable_type_reported_against_element() {
        let round = TestRound::new();
        let child = round.root().fork(TestElement::new("SongDao").build());

        let err = child.resolve_type(&TypeName::new("Playlist")).unwrap_err();

        assert!(err.is_element_fatal());
        let errors = round.collector().of_severity(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].element.as_deref(), Some("SongDao"));
    }

    #[test]
    fn test_resolution_is_cached_per_scope() {
        let round = TestRound::new();
        let child = round.root().fork(TestElement::new("SongDao").build());

        round.root().resolve_type(&TypeName::new("UUID")).unwrap();
        child.resolve_type(&TypeName::new("UUID")).unwrap();
        child.resolve_type(&TypeName::new("UUID")).unwrap();

        let stats = round.root().cache().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn test_process_element_skips_element_fatal_errors() {
        let round = TestRound::new();
        let root = round.root();

        let skipped = root
            .process_element(TestElement::new("PlaylistDao").build(), |ctx| {
                ctx.resolve_type(&TypeName::new("Playlist"))
            })
            .unwrap();
        let kept = root
            .process_element(TestElement::new("SongDao").build(), |ctx| {
                ctx.resolve_type(&TypeName::new("String"))
            })
            .unwrap();

        assert!(skipped.is_none());
        assert!(kept.is_some_and(|chain| chain.is_direct()));
        assert_eq!(round.collector().of_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn test_process_element_propagates_round_fatal_errors() {
        let round = TestRound::new();

        let result = round
            .root()
            .process_element(TestElement::new("MusicDatabase").build(), |ctx| {
                ctx.attach_database_verifier(song_schema())?;
                ctx.attach_database_verifier(song_schema())
            });

        assert!(matches!(
            result,
            Err(ProcessorError::VerifierAlreadyAttached { .. })
        ));
    }

    #[test]
    fn test_clean_round_has_no_errors() {
        let round = TestRound::new();
        let child = round.root().fork(TestElement::new("SongDao").build());
        assert_resolves_to(&child, "Instant", "Long");
        assert_no_errors(round.collector());
    }
}
