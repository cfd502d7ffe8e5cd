mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - workflow_tests: End-to-end runs of the hours correction review flow
