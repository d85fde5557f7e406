#[cfg(test)]
mod verify {
    use taxscan::language::*;
    use taxscan::machine::{StateMachine, TableStateMachine};
    use taxscan::scanning::{scan_file, ScanOptions, UnknownPolicy};

    /// Every name resolves to a command unless registered otherwise,
    /// mirroring a fully populated PATH.
    struct TestMachine {
        table: TableStateMachine,
    }

    fn test_machine() -> TestMachine {
        let mut table = TableStateMachine::new();
        table.register("noop", value_strat());
        table.register("if", branch_strat(&["else"]));
        table.register("hexdump", custom_strat(BlockFunction::Append));
        TestMachine { table }
    }

    impl StateMachine for TestMachine {
        fn tax_strat(&self, instr_name: &str) -> Option<TaxStrat> {
            self.table
                .tax_strat(instr_name)
                .or_else(|| Some(command_strat()))
        }
    }

    fn instr(name: &str, input: Vec<Line>) -> InstructionTaxonomy {
        InstructionTaxonomy {
            name: name.to_string(),
            input,
            branches: vec![],
        }
    }

    fn empty_line() -> Line {
        Line::from_tokens(0, vec![])
    }

    #[test]
    fn scan_lines_one_by_one() {
        let lines = vec![
            "print 'Hello'",
            "var name := 'bob'",
            "debug()",
            "exit",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        let expected = FileTaxonomy {
            routine: RoutineTaxonomy {
                instructions: vec![
                    instr(
                        "print",
                        vec![tokenize(1, "print 'Hello'").crop_from_first_word()],
                    ),
                    instr(
                        "var",
                        vec![tokenize(2, "var name := 'bob'").crop_from_first_word()],
                    ),
                    instr("debug", vec![tokenize(3, "debug()").crop_from_first_word()]),
                    instr("exit", vec![tokenize(4, "exit").crop_from_first_word()]),
                ],
            },
            errors: vec![],
        };

        assert_eq!(actual, expected);
    }

    #[test]
    fn single_command_keeps_argument_text() {
        let actual = scan_file(&["stdout 'Hello'"], &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let instructions = &actual
            .routine
            .instructions;
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].name, "stdout");
        assert_eq!(instructions[0].input[0].raw(), " 'Hello'");
        assert!(instructions[0]
            .branches
            .is_empty());
    }

    #[test]
    fn block_under_value_instruction_fails() {
        let actual = scan_file(
            &["noop", "   stdout 'Hello'"],
            &test_machine(),
            ScanOptions::default(),
        );

        let expected =
            FileTaxonomy::failed(vec![CompilationError::InstructionDoesNotAcceptBlock(2)]);
        assert_eq!(actual, expected);
    }

    #[test]
    fn if_else_produces_two_branches() {
        let lines = vec![
            "if true",
            "\tprint 'World'",
            "else",
            "   print 'Bye'",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        let expected = FileTaxonomy {
            routine: RoutineTaxonomy {
                instructions: vec![InstructionTaxonomy {
                    name: "if".to_string(),
                    input: vec![tokenize(1, "if true").crop_from_first_word()],
                    branches: vec![
                        BranchTaxonomy {
                            default_branch: true,
                            input: empty_line(),
                            routine: RoutineTaxonomy {
                                instructions: vec![instr(
                                    "print",
                                    vec![tokenize(2, "\tprint 'World'").crop_from_first_word()],
                                )],
                            },
                        },
                        BranchTaxonomy {
                            default_branch: false,
                            input: tokenize(3, "else").crop_from_first_word(),
                            routine: RoutineTaxonomy {
                                instructions: vec![instr(
                                    "print",
                                    vec![tokenize(4, "   print 'Bye'").crop_from_first_word()],
                                )],
                            },
                        },
                    ],
                }],
            },
            errors: vec![],
        };

        assert_eq!(actual, expected);
    }

    #[test]
    fn else_if_chain() {
        let lines = vec![
            "if a",
            "\tfirst run",
            "else if b",
            "\tsecond run",
            "else",
            "\tthird run",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let branches = &actual
            .routine
            .instructions[0]
            .branches;
        assert_eq!(branches.len(), 3);
        assert!(branches[0].default_branch);
        assert!(!branches[1].default_branch);
        assert_eq!(branches[1].input.raw(), " if b");
        assert!(!branches[2].default_branch);
        assert_eq!(branches[2].input.raw(), "");
        for (branch, name) in branches
            .iter()
            .zip(["first", "second", "third"])
        {
            assert_eq!(
                branch
                    .routine
                    .instructions[0]
                    .name,
                name
            );
        }
    }

    #[test]
    fn empty_branch_body_is_discarded() {
        let lines = vec!["if a", "\tx", "else", "z"];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let instructions = &actual
            .routine
            .instructions;
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].name, "if");
        assert_eq!(
            instructions[0]
                .branches
                .len(),
            1
        );
        assert_eq!(instructions[1].name, "z");
    }

    #[test]
    fn scanning_continues_after_branch_chain() {
        let lines = vec!["if a", "\tx 1", "else", "\ty 2", "z 3"];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let instructions = &actual
            .routine
            .instructions;
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[1].name, "z");
        assert_eq!(instructions[1].input[0].line_num, 5);
    }

    #[test]
    fn append_block_collects_trimmed_lines_until_end() {
        let lines = vec![
            "hexdump mydata",
            "   0A FF",
            "   12 34",
            "end",
            "stdout done",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        let expected = FileTaxonomy {
            routine: RoutineTaxonomy {
                instructions: vec![
                    instr(
                        "hexdump",
                        vec![
                            tokenize(1, "hexdump mydata").crop_from_first_word(),
                            tokenize(2, "   0A FF").trim(),
                            tokenize(3, "   12 34").trim(),
                        ],
                    ),
                    instr(
                        "stdout",
                        vec![tokenize(5, "stdout done").crop_from_first_word()],
                    ),
                ],
            },
            errors: vec![],
        };

        assert_eq!(actual, expected);
    }

    #[test]
    fn append_block_without_own_argument() {
        let lines = vec!["hexdump", "   0A FF", "end"];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let input = &actual
            .routine
            .instructions[0]
            .input;
        assert_eq!(input.len(), 1);
        assert_eq!(input[0].raw(), "0A FF");
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let lines = vec![
            "# a header comment",
            "print 'a'",
            "",
            "#<",
            "all of this",
            "is ignored >#",
            "print 'b'",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let instructions = &actual
            .routine
            .instructions;
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].input[0].line_num, 2);
        assert_eq!(instructions[1].input[0].line_num, 7);
    }

    #[test]
    fn comments_do_not_affect_block_decisions() {
        let lines = vec![
            "if true",
            "#<",
            "a note about the branch",
            "done >#",
            "\tprint 'World'",
            "else",
            "   print 'Bye'",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let instructions = &actual
            .routine
            .instructions;
        assert_eq!(instructions.len(), 1);
        let branches = &instructions[0].branches;
        assert_eq!(branches.len(), 2);
        assert_eq!(
            branches[0]
                .routine
                .instructions[0]
                .input[0]
                .line_num,
            5
        );
    }

    #[test]
    fn inconsistent_indentation_fails() {
        let lines = vec!["if true", "\tprint a", "        print b"];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        let expected = FileTaxonomy::failed(vec![CompilationError::InvalidIndentation(3)]);
        assert_eq!(actual, expected);
    }

    #[test]
    fn deeply_nested_branches_preserve_line_numbers() {
        let lines = vec![
            "if a",
            "\tif b",
            "\t\tif c",
            "\t\t\tleaf 'x'",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert!(!actual.is_failed());
        let outer = &actual
            .routine
            .instructions[0];
        assert_eq!(outer.name, "if");
        let middle = &outer.branches[0]
            .routine
            .instructions[0];
        assert_eq!(middle.name, "if");
        assert_eq!(middle.input[0].raw(), " b");
        let inner = &middle.branches[0]
            .routine
            .instructions[0];
        assert_eq!(inner.name, "if");
        let leaf = &inner.branches[0]
            .routine
            .instructions[0];
        assert_eq!(leaf.name, "leaf");
        assert_eq!(leaf.input[0].raw(), " 'x'");
        assert_eq!(leaf.input[0].line_num, 4);
    }

    #[test]
    fn unknown_name_rejected_when_configured() {
        let mut table = TableStateMachine::new();
        table.register("if", branch_strat(&["else"]));
        let options = ScanOptions {
            unknown_instructions: UnknownPolicy::Reject,
        };

        let actual = scan_file(&["mystery", "   data"], &table, options);

        let expected = FileTaxonomy::failed(vec![CompilationError::UnknownInstruction(
            1,
            "mystery".to_string(),
        )]);
        assert_eq!(actual, expected);
    }

    #[test]
    fn unknown_name_defaults_to_command() {
        let table = TableStateMachine::new();

        let actual = scan_file(&["mystery", "   data"], &table, ScanOptions::default());

        assert!(!actual.is_failed());
        let input = &actual
            .routine
            .instructions[0]
            .input;
        assert_eq!(input.len(), 1);
        assert_eq!(input[0].raw(), "data");
    }

    #[test]
    fn display_renders_the_tree() {
        let lines = vec![
            "if true",
            "\tprint 'World'",
            "else",
            "   print 'Bye'",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        assert_eq!(
            format!("{}", actual),
            "if ` true`\n\
             + branch\n\
             \x20 print ` 'World'`\n\
             + branch ``\n\
             \x20 print ` 'Bye'`\n"
        );
    }

    #[test]
    fn nested_failure_aborts_the_whole_scan() {
        let lines = vec![
            "if a",
            "\tnoop",
            "\t\tstdout 'under a value instruction'",
        ];

        let actual = scan_file(&lines, &test_machine(), ScanOptions::default());

        let expected =
            FileTaxonomy::failed(vec![CompilationError::InstructionDoesNotAcceptBlock(3)]);
        assert_eq!(actual, expected);
    }
}
