pub const BANNER: &str =
    "Document Chat: upload PDF documents and ask questions about their content.";

pub const HELP: &[&str] = &[
    "Commands:",
    "  :upload <file.pdf>...   upload one or more PDF files",
    "  :toggle <n|id>...       select or deselect documents by list number or id",
    "  :docs                   show the document list",
    "  :help                   show this help",
    "  :quit                   exit (all state is lost)",
    "Any other line is sent as a question about the selected documents.",
];

pub const PROMPT_USER: &str = "you>";
pub const PROMPT_AI: &str = "ai>";
pub const PROMPT_ERROR: &str = "error>";
pub const NO_DOCUMENTS: &str = "No documents uploaded yet";
pub const WAITING_FOR_ANSWER: &str = "Waiting for the answer...";
