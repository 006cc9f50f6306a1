pub const PROMPTER_CLI: &str = "prompter-cli";

/// Fixed instruction used by the `kql` subcommand.
pub const KQL_SYSTEM_PROMPT: &str = "You are an assistant that generates Kusto Query Language \
(KQL) queries. Given a natural language description of a question about security or log data, \
respond only with the corresponding KQL query.";
