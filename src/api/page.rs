/// The single page: connection dot probed on load, a button that runs the
/// full sweep and shows its report verbatim.
pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Pattern Whisper</title>
  <style>
    body { font-family: system-ui, sans-serif; background: #f9fafb; color: #111827; margin: 0; padding: 2rem; }
    main { max-width: 56rem; margin: 0 auto; }
    h1 { text-align: center; margin-bottom: .25rem; }
    .tagline { text-align: center; color: #4b5563; margin-bottom: 2rem; }
    .card { background: #fff; border-radius: .75rem; padding: 1.5rem; margin-bottom: 2rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
    .status { display: flex; align-items: center; gap: .75rem; margin-bottom: 1rem; }
    .dot { width: .75rem; height: .75rem; border-radius: 9999px; }
    .pending { background: #facc15; }
    .connected { background: #4ade80; }
    .failed { background: #f87171; }
    button { background: #2563eb; color: #fff; border: 0; border-radius: .5rem; padding: .5rem 1.5rem; cursor: pointer; }
    button:hover { background: #1d4ed8; }
    button:disabled { opacity: .6; cursor: wait; }
    pre { background: #111827; color: #4ade80; padding: 1rem; border-radius: .5rem; white-space: pre-wrap; font-size: .875rem; }
  </style>
</head>
<body>
<main>
  <h1>Pattern Whisper</h1>
  <p class="tagline">Find patterns in history. See what happened next.</p>

  <section class="card">
    <h2>Database Connection</h2>
    <div class="status">
      <div id="dot" class="dot pending"></div>
      <span id="status-text">Testing connection...</span>
    </div>
    <button id="run-tests">Run Full API Tests</button>
  </section>

  <section class="card" id="results-card" hidden>
    <h3>Test Results</h3>
    <pre id="results"></pre>
  </section>
</main>
<script>
  const dot = document.getElementById('dot');
  const statusText = document.getElementById('status-text');
  const button = document.getElementById('run-tests');
  const resultsCard = document.getElementById('results-card');
  const results = document.getElementById('results');

  function setStatus(status, reason) {
    dot.className = 'dot ' + status;
    statusText.textContent =
      status === 'connected' ? 'Connected' :
      status === 'failed' ? 'Connection failed' + (reason ? ': ' + reason : '') :
      'Testing connection...';
  }

  async function checkConnection() {
    try {
      const resp = await fetch('/api/connection');
      const body = await resp.json();
      setStatus(body.status, body.reason);
    } catch (err) {
      setStatus('failed', String(err));
    }
  }

  button.addEventListener('click', async () => {
    button.disabled = true;
    resultsCard.hidden = false;
    results.textContent = 'Running tests...';
    try {
      const resp = await fetch('/api/tests', { method: 'POST' });
      results.textContent = await resp.text();
    } catch (err) {
      results.textContent = 'FATAL ERROR: ' + err;
    } finally {
      button.disabled = false;
    }
  });

  checkConnection();
</script>
</body>
</html>
"#;
