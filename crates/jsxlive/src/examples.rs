//! Built-in example projects and the default project.

use crate::config::DEFAULT_ENTRY_FILE;
use crate::project::ProjectFiles;

#[derive(Debug, Clone, Copy)]
pub struct ExampleData {
    pub name: &'static str,
    pub files: &'static [(&'static str, &'static str)],
}

impl ExampleData {
    pub fn project_files(&self) -> ProjectFiles {
        self.files.iter().copied().collect()
    }

    /// Files with the example's `App.jsx` stored under `entry_file` instead.
    pub fn project_files_with_entry(&self, entry_file: &str) -> ProjectFiles {
        self.files
            .iter()
            .map(|&(name, source)| {
                let name = if name == DEFAULT_ENTRY_FILE { entry_file } else { name };
                (name, source)
            })
            .collect()
    }
}

const DEFAULT_APP: &str = r#"function App() {
  return <h1>Hello JSX!</h1>;
}"#;

const COUNTER_APP: &str = r#"function App() {
  const [count, setCount] = React.useState(0);
  return (
    <div>
      <h2>Counter: {count}</h2>
      <button onClick={() => setCount(count + 1)}>Increment</button>
    </div>
  );
}"#;

const TODO_APP: &str = r#"function App() {
  const [todos, setTodos] = React.useState([]);
  const [text, setText] = React.useState("");
  return (
    <div>
      <h2>Todo List</h2>
      <form onSubmit={e => {e.preventDefault(); setTodos([...todos, text]); setText("");}}>
        <input value={text} onChange={e => setText(e.target.value)} />
        <button type="submit">Add</button>
      </form>
      <ul>
        {todos.map((todo, idx) => <li key={idx}>{todo}</li>)}
      </ul>
    </div>
  );
}"#;

// Files are concatenated into one classic script, so no `export` here.
const TODO_UTILS: &str = r#"// Helper for Todo (dummy example)
function greet(name) {
  return "Hello " + name;
}"#;

const STYLED_BUTTON_APP: &str = r#"function App() {
  return (
    <button style={{ background: "rebeccapurple", color: "white", fontSize: 24, padding: 12, borderRadius: 8 }}>
      Beautiful Button
    </button>
  );
}"#;

/// Files of a fresh project, keyed by the default entry file name.
pub static DEFAULT_PROJECT: ExampleData = ExampleData {
    name: "Default",
    files: &[("App.jsx", DEFAULT_APP)],
};

pub static EXAMPLE_DATAS: [ExampleData; 3] = [
    ExampleData {
        name: "Counter",
        files: &[("App.jsx", COUNTER_APP)],
    },
    ExampleData {
        name: "Todo List",
        files: &[("App.jsx", TODO_APP), ("utils.js", TODO_UTILS)],
    },
    ExampleData {
        name: "Styled Button",
        files: &[("App.jsx", STYLED_BUTTON_APP)],
    },
];

pub fn find_example(name: &str) -> Option<&'static ExampleData> {
    EXAMPLE_DATAS.iter().find(|example| example.name == name)
}
