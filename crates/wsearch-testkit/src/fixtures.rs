//! Workspace trees used by search tests

use std::path::Path;

/// Write `content` to `root/rel`, creating parent directories
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, content).expect("Failed to write fixture file");
}

/// A small editor project:
///
/// - `src/App.tsx` line 10 is `const App = () => {`
/// - `src/components/Editor.tsx` line 42 is `function handleSave() {`
///
/// No other line contains "app", "function" or "handlesave" in any case.
pub fn write_sample_workspace(root: &Path) {
    let app = [
        "import React from 'react';",
        "import { Editor } from './components/Editor';",
        "",
        "// Root layout for the shell.",
        "type Props = {",
        "  title?: string;",
        "};",
        "",
        "// TODO: theme provider",
        "const App = () => {",
        "  return <Editor />;",
        "};",
        "",
    ]
    .join("\n");
    write_file(root, "src/App.tsx", &app);

    let mut editor: Vec<String> = vec![
        "import React, { useState } from 'react';".to_string(),
        String::new(),
        "export const Editor = () => {".to_string(),
    ];
    while editor.len() < 41 {
        editor.push(format!("  // placeholder {}", editor.len() + 1));
    }
    editor.push("function handleSave() {".to_string());
    editor.push("  return null;".to_string());
    editor.push("}".to_string());
    write_file(root, "src/components/Editor.tsx", &editor.join("\n"));

    write_file(root, "README.md", "# Workspace\n\nNotes for the search tests.\n");
}
