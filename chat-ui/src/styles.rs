/// Stylesheet for the whole app. Colors come from the `data-theme` variables.
pub const APP_STYLES: &str = r#"
:root,
:root[data-theme="dark"] {
    --bg-primary: #0f172a;
    --bg-secondary: #1e293b;
    --bg-hover: #273449;
    --border-color: #334155;
    --text-primary: #f8fafc;
    --text-secondary: #94a3b8;
    --text-muted: #64748b;
    --accent-bg: #3b82f6;
    --accent-bg-hover: #2563eb;
    --danger: #f87171;
    --danger-bg: rgba(248, 113, 113, 0.1);
    --success: #10b981;
    --warning: #f59e0b;
    color-scheme: dark;
}

:root[data-theme="light"] {
    --bg-primary: #ffffff;
    --bg-secondary: #f1f5f9;
    --bg-hover: #e2e8f0;
    --border-color: #cbd5e1;
    --text-primary: #0f172a;
    --text-secondary: #475569;
    --text-muted: #94a3b8;
    --accent-bg: #2563eb;
    --accent-bg-hover: #1d4ed8;
    --danger: #dc2626;
    --danger-bg: rgba(220, 38, 38, 0.08);
    --success: #059669;
    --warning: #d97706;
    color-scheme: light;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
}

.icon-button {
    display: inline-flex;
    align-items: center;
    justify-content: center;
    min-width: 2rem;
    height: 2rem;
    padding: 0 0.4rem;
    background: transparent;
    color: var(--text-secondary);
    border: 1px solid var(--border-color);
    border-radius: 0.5rem;
    cursor: pointer;
}

.icon-button:hover {
    background: var(--bg-hover);
    color: var(--text-primary);
}

/* Layout */
.app-layout {
    display: flex;
    height: 100vh;
    overflow: hidden;
}

.chat-column {
    flex: 1;
    display: flex;
    flex-direction: column;
    justify-content: center;
    min-width: 0;
}

/* Sidebar */
.sidebar {
    width: 16rem;
    display: flex;
    flex-direction: column;
    background: var(--bg-secondary);
    border-right: 1px solid var(--border-color);
    transition: width 0.2s;
    flex-shrink: 0;
}

.sidebar.collapsed { width: 3.5rem; }

.sidebar.collapsed .sidebar-title,
.sidebar.collapsed .sidebar-label,
.sidebar.collapsed .conversation-text,
.sidebar.collapsed .conversation-delete {
    display: none;
}

.sidebar-header {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    padding: 1rem 0.75rem 0.5rem 1rem;
}

.sidebar-title {
    flex: 1;
    margin: 0;
    font-size: 1rem;
    font-weight: 500;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
}

.sidebar-content {
    flex: 1;
    overflow-y: auto;
    padding: 0.5rem;
}

.sidebar-link {
    display: flex;
    align-items: flex-start;
    gap: 0.5rem;
    padding: 0.5rem;
    color: var(--text-primary);
    text-decoration: none;
    border-radius: 0.5rem;
    min-width: 0;
}

.sidebar-link:hover { background: var(--bg-hover); }

.new-conversation { margin-bottom: 0.5rem; }

.conversation-list {
    list-style: none;
    margin: 0;
    padding: 0;
}

.conversation-item {
    display: flex;
    align-items: center;
    border-radius: 0.5rem;
}

.conversation-item .conversation-link { flex: 1; }

.conversation-item.active { background: var(--bg-hover); }

.conversation-item.active .conversation-link { pointer-events: none; }

.conversation-text {
    display: flex;
    flex-direction: column;
    min-width: 0;
}

.conversation-preview {
    max-width: 150px;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
}

.conversation-time {
    font-size: 0.75rem;
    color: var(--text-muted);
}

.conversation-delete {
    visibility: hidden;
    border: none;
    margin-right: 0.25rem;
}

.conversation-item:hover .conversation-delete { visibility: visible; }

.conversation-delete:hover { color: var(--danger); }

.sidebar-footer {
    padding: 0.75rem 1rem;
    border-top: 1px solid var(--border-color);
}

/* Chat */
.chat-container {
    position: relative;
    display: flex;
    flex-direction: column;
    width: 100%;
    max-width: 56rem;
    height: 100vh;
    margin: 0 auto;
    overflow: hidden;
}

.chat-missing {
    margin: auto;
    text-align: center;
    color: var(--text-secondary);
}

.chat-missing a { color: var(--accent-bg); }

.messages-scroll-area {
    flex: 1;
    overflow-y: auto;
    overflow-x: hidden;
    padding: 1rem;
}

.messages-scroll-area::-webkit-scrollbar { width: 6px; }

.messages-scroll-area::-webkit-scrollbar-thumb {
    background: var(--border-color);
    border-radius: 3px;
}

.messages-list {
    display: flex;
    flex-direction: column;
    gap: 1rem;
}

.empty-state {
    display: flex;
    flex-direction: column;
    align-items: center;
    padding: 3rem 1rem;
    color: var(--text-muted);
    text-align: center;
}

.empty-icon {
    font-size: 3rem;
    margin-bottom: 1rem;
    opacity: 0.5;
}

.empty-state p {
    margin: 0 0 0.25rem 0;
    font-weight: 500;
    color: var(--text-secondary);
}

.message-row { display: flex; }

.user-row { justify-content: flex-end; }

.message-content {
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
    max-width: 100%;
}

.user-row .message-content {
    align-items: flex-end;
    max-width: 80%;
}

.message-bubble {
    padding: 0.75rem 1rem;
    border-radius: 1rem;
    font-size: 0.9375rem;
    line-height: 1.5;
    overflow-wrap: anywhere;
}

.user-bubble {
    background: var(--accent-bg);
    color: white;
    white-space: pre-wrap;
    border-bottom-right-radius: 0.25rem;
}

.assistant-bubble {
    background: transparent;
    padding-left: 0;
    padding-right: 0;
}

.markdown-body pre {
    background: var(--bg-secondary);
    border: 1px solid var(--border-color);
    border-radius: 0.5rem;
    padding: 0.75rem;
    overflow-x: auto;
}

.markdown-body code { font-family: ui-monospace, monospace; font-size: 0.875em; }

.markdown-body table { border-collapse: collapse; }

.markdown-body th,
.markdown-body td {
    border: 1px solid var(--border-color);
    padding: 0.25rem 0.5rem;
}

.markdown-body a { color: var(--accent-bg); }

.reasoning,
.tool-call,
.sources {
    border: 1px solid var(--border-color);
    border-radius: 0.5rem;
    padding: 0.5rem 0.75rem;
    font-size: 0.875rem;
    color: var(--text-secondary);
}

.reasoning summary,
.tool-call summary,
.sources summary {
    cursor: pointer;
    display: flex;
    align-items: center;
    gap: 0.5rem;
}

.reasoning-text { white-space: pre-wrap; margin-top: 0.5rem; }

.sources ul { margin: 0.5rem 0 0 0; padding-left: 1.25rem; }

.sources a { color: var(--accent-bg); }

.tool-name { font-weight: 500; color: var(--text-primary); }

.tool-state {
    margin-left: auto;
    font-size: 0.75rem;
    padding: 0.1rem 0.5rem;
    border-radius: 999px;
    background: var(--bg-secondary);
}

.tool-state.running { color: var(--warning); }
.tool-state.completed { color: var(--success); }
.tool-state.failed { color: var(--danger); }

.tool-section h4 {
    margin: 0.75rem 0 0.25rem 0;
    font-size: 0.75rem;
    text-transform: uppercase;
    color: var(--text-muted);
}

.tool-section pre {
    margin: 0;
    padding: 0.5rem;
    background: var(--bg-secondary);
    border-radius: 0.375rem;
    white-space: pre-wrap;
    overflow-wrap: anywhere;
}

.tool-error pre { color: var(--danger); }

.message-image {
    max-width: 100%;
    border-radius: 0.5rem;
}

.message-file,
.message-document {
    color: var(--text-secondary);
    font-size: 0.875rem;
}

.message-actions {
    display: flex;
    gap: 0.25rem;
}

.message-actions .icon-button { border: none; }

.error-banner {
    margin: 0.5rem 1rem;
    padding: 0.75rem 1rem;
    background: var(--danger-bg);
    border: 1px solid var(--danger);
    border-radius: 0.375rem;
    color: var(--danger);
    font-size: 0.875rem;
}

.typing-indicator {
    display: flex;
    gap: 0.25rem;
    padding: 1rem 0;
}

.typing-indicator span {
    width: 0.5rem;
    height: 0.5rem;
    background: var(--text-muted);
    border-radius: 50%;
    animation: typing-bounce 1.4s infinite ease-in-out both;
}

.typing-indicator span:nth-child(1) { animation-delay: -0.32s; }
.typing-indicator span:nth-child(2) { animation-delay: -0.16s; }

@keyframes typing-bounce {
    0%, 80%, 100% { transform: scale(0); }
    40% { transform: scale(1); }
}

.scroll-button {
    position: absolute;
    left: 50%;
    bottom: 9rem;
    transform: translateX(-50%);
    border-radius: 999px;
    background: var(--bg-primary);
}

/* Prompt input */
.prompt-input {
    position: sticky;
    bottom: 0;
    margin: 0.75rem;
    background: var(--bg-primary);
    border: 1px solid var(--border-color);
    border-radius: 1rem;
    flex-shrink: 0;
}

.chat-textarea {
    width: 100%;
    padding: 0.75rem 1rem;
    background: transparent;
    color: var(--text-primary);
    border: none;
    font-size: 0.9375rem;
    font-family: inherit;
    resize: none;
    outline: none;
    min-height: 3rem;
    max-height: 12rem;
    field-sizing: content;
}

.chat-textarea::placeholder { color: var(--text-muted); }

.prompt-toolbar {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 0.5rem;
}

.prompt-tools {
    display: flex;
    align-items: center;
    gap: 0.5rem;
}

.tools-menu { position: relative; }

.tools-dropdown {
    position: absolute;
    bottom: 2.5rem;
    left: 0;
    min-width: 14rem;
    padding: 0.25rem;
    background: var(--bg-primary);
    border: 1px solid var(--border-color);
    border-radius: 0.5rem;
    box-shadow: 0 8px 24px rgba(0, 0, 0, 0.2);
    z-index: 10;
}

.tool-toggle {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    padding: 0.375rem 0.5rem;
    border-radius: 0.25rem;
    cursor: pointer;
    font-size: 0.875rem;
}

.tool-toggle:hover { background: var(--bg-hover); }

.tool-toggle .tool-name { flex: 1; font-weight: 400; }

.switch {
    position: relative;
    width: 2rem;
    height: 1.125rem;
    border-radius: 999px;
    background: var(--border-color);
    transition: background 0.2s;
}

.switch::after {
    content: "";
    position: absolute;
    top: 0.125rem;
    left: 0.125rem;
    width: 0.875rem;
    height: 0.875rem;
    border-radius: 50%;
    background: white;
    transition: transform 0.2s;
}

.switch.on { background: var(--accent-bg); }

.switch.on::after { transform: translateX(0.875rem); }

.model-select,
.model-label {
    height: 2rem;
    padding: 0 0.5rem;
    font-size: 0.875rem;
    color: var(--text-secondary);
    background: transparent;
    border: none;
    display: inline-flex;
    align-items: center;
}

.send-button {
    width: 2.25rem;
    height: 2.25rem;
    display: flex;
    align-items: center;
    justify-content: center;
    background: var(--accent-bg);
    color: white;
    border: none;
    border-radius: 50%;
    cursor: pointer;
    font-size: 1rem;
    flex-shrink: 0;
}

.send-button:hover:not(:disabled) { background: var(--accent-bg-hover); }

.send-button:disabled {
    background: var(--border-color);
    color: var(--text-muted);
    cursor: not-allowed;
}
"#;
