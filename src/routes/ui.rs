use axum::{response::Html, Router, routing::get};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>AI Trip Planner</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; color: #1d1d1f; display: flex; min-height: 100vh; }
    aside { width: 320px; padding: 1.5rem; background: #f6f8fa; border-right: 1px solid #ddd; }
    main { flex: 1; padding: 1.5rem 2rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; width: 100%; }
    .row { display: flex; gap: 0.5rem; }
    .row > div { flex: 1; }
    .hint { margin-top: 0.5rem; font-size: 0.9rem; }
    .hint.error, .status.error { color: #b00020; }
    .status { padding: 0.75rem; border-radius: 6px; background: #eef4ff; margin-bottom: 1rem; }
    .status.done { background: #e8f7ee; }
    .entry { border: 1px solid #ddd; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; white-space: pre-wrap; }
    .entry.user { background: #fafafa; }
    details { margin-bottom: 1rem; }
  </style>
</head>
<body>
  <aside>
    <details>
      <summary>Usage example</summary>
      <ol>
        <li><b>Destination</b>: Jeju Island</li>
        <li><b>Start date</b>: 2024-12-22</li>
        <li><b>End date</b>: 2024-12-24</li>
        <li><b>Preferences</b>: nature and food</li>
      </ol>
      <p>The planner searches for travel information, then writes a day-by-day itinerary.</p>
    </details>

    <h2>Trip details</h2>
    <label for="destination">Destination</label>
    <input id="destination" placeholder="e.g. Jeju Island, Paris, Tokyo" />
    <div class="row">
      <div>
        <label for="startDate">Start date</label>
        <input id="startDate" type="date" />
      </div>
      <div>
        <label for="endDate">End date</label>
        <input id="endDate" type="date" />
      </div>
    </div>
    <div id="days" class="hint"></div>

    <label for="preferences">Preferences (optional)</label>
    <textarea id="preferences" rows="4" placeholder="e.g. scenery, food tours, history, relaxing"></textarea>

    <button id="generateBtn">Generate itinerary</button>
    <button id="resetBtn">New trip plan</button>
  </aside>

  <main>
    <h1>AI Trip Planner</h1>
    <div id="status" class="status">Fill in the trip details on the left and press "Generate itinerary".</div>
    <div id="history"></div>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const statusBox = $('status');
    const historyBox = $('history');

    // assigned by the server on the first successful plan
    let sessionId = localStorage.getItem('tripPlannerSession');

    const pad = (n) => String(n).padStart(2, '0');
    const iso = (d) => `${d.getFullYear()}-${pad(d.getMonth() + 1)}-${pad(d.getDate())}`;
    const today = new Date();
    const later = new Date(today.getFullYear(), today.getMonth(), today.getDate() + 2);
    $('startDate').value = iso(today);
    $('endDate').value = iso(later);
    $('startDate').min = iso(today);
    $('endDate').min = iso(today);

    function updateDays() {
      const start = new Date($('startDate').value);
      const end = new Date($('endDate').value);
      const hint = $('days');
      if (end >= start) {
        hint.className = 'hint';
        hint.textContent = `${Math.round((end - start) / 86400000) + 1}-day trip`;
      } else {
        hint.className = 'hint error';
        hint.textContent = 'The end date must be on or after the start date.';
      }
    }
    $('startDate').addEventListener('change', updateDays);
    $('endDate').addEventListener('change', updateDays);
    updateDays();

    function setStatus(text, kind) {
      statusBox.className = 'status' + (kind ? ' ' + kind : '');
      statusBox.textContent = text;
    }

    async function loadHistory() {
      if (!sessionId) return;
      const res = await fetch(`/api/history/${sessionId}`);
      const json = await res.json();
      historyBox.innerHTML = '';
      for (const entry of json.entries) {
        const div = document.createElement('div');
        div.className = 'entry ' + entry.role;
        div.textContent = (entry.role === 'user' ? 'You: ' : 'Planner: ') + entry.content;
        historyBox.appendChild(div);
      }
    }

    function handleEvent(name, data) {
      const payload = JSON.parse(data);
      if (name === 'progress') {
        setStatus(payload.message);
      } else if (name === 'result') {
        sessionId = payload.session_id;
        localStorage.setItem('tripPlannerSession', sessionId);
        setStatus('Your itinerary is ready!', 'done');
        loadHistory();
      } else if (name === 'error') {
        setStatus(`An error occurred: ${payload.error}`, 'error');
      }
    }

    $('generateBtn').addEventListener('click', async () => {
      const body = {
        destination: $('destination').value,
        start_date: $('startDate').value,
        end_date: $('endDate').value,
        preferences: $('preferences').value || null,
      };
      if (sessionId) body.session_id = sessionId;
      setStatus('Starting your travel plan...');
      const res = await fetch('/api/plan/stream', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      if (!res.ok) {
        const json = await res.json().catch(() => ({ error: res.statusText }));
        setStatus(json.error, 'error');
        return;
      }

      const reader = res.body.getReader();
      const decoder = new TextDecoder();
      let buffer = '';
      for (;;) {
        const { value, done } = await reader.read();
        if (done) break;
        buffer += decoder.decode(value, { stream: true });
        let split;
        while ((split = buffer.indexOf('\n\n')) >= 0) {
          const chunk = buffer.slice(0, split);
          buffer = buffer.slice(split + 2);
          let name = 'message';
          const data = [];
          for (const line of chunk.split('\n')) {
            if (line.startsWith('event:')) name = line.slice(6).trim();
            else if (line.startsWith('data:')) data.push(line.slice(5).trim());
          }
          if (data.length) handleEvent(name, data.join('\n'));
        }
      }
    });

    $('resetBtn').addEventListener('click', async () => {
      if (sessionId) {
        await fetch(`/api/history/${sessionId}`, { method: 'DELETE' });
      }
      historyBox.innerHTML = '';
      setStatus('Fill in the trip details on the left and press "Generate itinerary".');
    });

    loadHistory();
  </script>
</body>
</html>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_index_serves_form() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = crate::routes::test_support::body_text(response).await;
        assert!(text.contains("id=\"destination\""));
        assert!(text.contains("/api/plan/stream"));
    }

    #[tokio::test]
    async fn test_form_script_runs_without_secure_context() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let text = crate::routes::test_support::body_text(response).await;
        // plain-HTTP pages have no crypto.randomUUID; the id comes from the server
        assert!(!text.contains("crypto."));
        assert!(text.contains("sessionId = payload.session_id"));
        assert!(text.contains("if (!sessionId) return;"));
        // local calendar date, not UTC
        assert!(!text.contains("toISOString"));
        assert!(text.contains("getFullYear()"));
    }
}
