//! Console relay shim injected into every synthesized document.
//! Installs before user code: wraps console.log/error/warn/info and window.onerror,
//! forwarding each call to the parent window as a `console` message.

/// JavaScript source of the shim. Each call still reaches the original console.
pub const CONSOLE_SHIM: &str = r#"(function(){
  var original = { log: console.log, error: console.error, warn: console.warn, info: console.info };
  function render(value) {
    if (typeof value === 'string') return value;
    if (value !== null && typeof value === 'object') {
      try { return JSON.stringify(value, null, 2); } catch (e) { return String(value); }
    }
    return String(value);
  }
  function send(logType, args) {
    try {
      window.parent.postMessage({ type: 'console', logType: logType, content: args.map(render).join(' ') }, '*');
    } catch (e) {}
  }
  ['log', 'error', 'warn', 'info'].forEach(function (name) {
    console[name] = function () {
      var args = Array.prototype.slice.call(arguments);
      original[name].apply(console, args);
      send(name, args);
    };
  });
  window.onerror = function (message, source, line) {
    send('error', [String(message) + ' (line ' + line + ')']);
    return true;
  };
})();"#;

/// The shim wrapped in its own script element.
pub fn shim_script() -> String {
    format!("<script>{}</script>", CONSOLE_SHIM)
}
